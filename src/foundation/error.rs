use crate::paint::background::BackgroundParseError;

pub type ResizeResult<T> = Result<T, ResizeError>;

#[derive(thiserror::Error, Debug)]
pub enum ResizeError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("background error: {0}")]
    Background(#[from] BackgroundParseError),

    #[error("config error: {0}")]
    Config(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResizeError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self::InvalidTarget(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ResizeError::decode("x")
                .to_string()
                .contains("decode error:")
        );
        assert!(
            ResizeError::encoding("x")
                .to_string()
                .contains("encoding error:")
        );
        assert!(
            ResizeError::invalid_target("x")
                .to_string()
                .contains("invalid target:")
        );
        assert!(
            ResizeError::config("x")
                .to_string()
                .contains("config error:")
        );
        assert!(
            ResizeError::archive("x")
                .to_string()
                .contains("archive error:")
        );
    }

    #[test]
    fn parse_errors_convert_into_background_variant() {
        let err: ResizeError = BackgroundParseError::Empty.into();
        assert!(matches!(err, ResizeError::Background(_)));
        assert!(err.to_string().starts_with("background error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ResizeError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
