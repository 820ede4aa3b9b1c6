use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{ResizeError, ResizeResult};

pub use kurbo::{Point, Rect, Vec2};

/// Output dimensions in pixels. Both sides are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TargetSpec {
    width: u32,
    height: u32,
}

impl TargetSpec {
    /// Create a validated target; zero on either side is rejected.
    pub fn new(width: u32, height: u32) -> ResizeResult<Self> {
        if width == 0 || height == 0 {
            return Err(ResizeError::invalid_target(format!(
                "width and height must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for TargetSpec {
    type Err = ResizeError;

    /// Parses `WxH` (also accepts `×` and uppercase `X`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (w, h) = s
            .split_once(['x', 'X', '×'])
            .ok_or_else(|| ResizeError::invalid_target(format!("expected WxH, got \"{s}\"")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| ResizeError::invalid_target(format!("invalid dimension \"{v}\"")))
        };
        Self::new(parse(w)?, parse(h)?)
    }
}

/// How the source is fitted into the target.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// Cover the target, anchored to the top edge; overflow below is clipped.
    Top,
    /// Cover the target, centered on both axes.
    #[default]
    Center,
    /// Fit inside the target and pad the remainder with a background.
    Fill,
}

impl CropMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Fill => "fill",
        }
    }

    /// `true` for the modes that scale to cover the target.
    pub fn is_cover(self) -> bool {
        !matches!(self, Self::Fill)
    }
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropMode {
    type Err = ResizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "fill" => Ok(Self::Fill),
            other => Err(ResizeError::config(format!(
                "unknown crop mode \"{other}\" (expected top, center or fill)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_rejects_zero_sides() {
        assert!(matches!(
            TargetSpec::new(0, 10),
            Err(ResizeError::InvalidTarget(_))
        ));
        assert!(matches!(
            TargetSpec::new(10, 0),
            Err(ResizeError::InvalidTarget(_))
        ));
        assert!(TargetSpec::new(1, 1).is_ok());
    }

    #[test]
    fn target_parses_wxh() {
        let t: TargetSpec = "1080x1350".parse().unwrap();
        assert_eq!((t.width(), t.height()), (1080, 1350));
        let t: TargetSpec = " 200 × 300 ".parse().unwrap();
        assert_eq!(t.to_string(), "200x300");
        assert!("200".parse::<TargetSpec>().is_err());
        assert!("0x5".parse::<TargetSpec>().is_err());
        assert!("ax5".parse::<TargetSpec>().is_err());
    }

    #[test]
    fn crop_mode_parses_case_insensitively() {
        assert_eq!("TOP".parse::<CropMode>().unwrap(), CropMode::Top);
        assert_eq!(" fill ".parse::<CropMode>().unwrap(), CropMode::Fill);
        assert!("stretch".parse::<CropMode>().is_err());
        assert_eq!(CropMode::default(), CropMode::Center);
        assert!(CropMode::Top.is_cover() && !CropMode::Fill.is_cover());
    }
}
