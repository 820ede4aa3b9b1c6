/// Zip packaging of batch results.
pub mod archive;
/// Output formats and encoders.
pub mod export;
