use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::foundation::error::{ResizeError, ResizeResult};
use crate::paint::background::Background;
use crate::render::surface::Surface;

/// Default lossy quality, matching common web export settings.
pub const DEFAULT_QUALITY: u8 = 92;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    WebP,
}

impl ExportFormat {
    pub const ALL: [Self; 3] = [Self::Jpeg, Self::Png, Self::WebP];

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
        }
    }

    /// Whether the encoder honors [`ExportSpec::quality`].
    pub fn uses_quality(self) -> bool {
        matches!(self, Self::Jpeg)
    }

    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = ResizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(ResizeError::config(format!(
                "unsupported export format \"{other}\" (expected jpeg, png or webp)"
            ))),
        }
    }
}

/// Requested output encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExportSpec {
    pub format: ExportFormat,
    quality: u8,
}

impl ExportSpec {
    /// `quality` is clamped to `1..=100`.
    pub fn new(format: ExportFormat, quality: u8) -> Self {
        Self {
            format,
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Format actually written: a transparent background forces PNG over formats
    /// without an alpha channel.
    pub fn effective_format(&self, background: Option<&Background>) -> ExportFormat {
        match background {
            Some(Background::Transparent) if !self.format.supports_alpha() => ExportFormat::Png,
            _ => self.format,
        }
    }
}

impl Default for ExportSpec {
    fn default() -> Self {
        Self::new(ExportFormat::default(), DEFAULT_QUALITY)
    }
}

/// Encode `surface` in `format`. Quality only applies to JPEG.
///
/// JPEG has no alpha channel; translucent pixels are flattened onto black.
pub fn encode_surface(
    surface: &Surface,
    format: ExportFormat,
    quality: u8,
) -> ResizeResult<Vec<u8>> {
    let (width, height) = (surface.width(), surface.height());
    let mut buf = Vec::new();

    match format {
        ExportFormat::Jpeg => {
            let rgb = surface.to_flattened_rgb();
            JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality.clamp(1, 100))
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| ResizeError::encoding(format!("encode JPEG: {e}")))?;
        }
        ExportFormat::Png => {
            let rgba = surface.to_straight_rgba();
            PngEncoder::new_with_quality(
                Cursor::new(&mut buf),
                CompressionType::Best,
                FilterType::Adaptive,
            )
            .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(|e| ResizeError::encoding(format!("encode PNG: {e}")))?;
        }
        ExportFormat::WebP => {
            let rgba = surface.to_straight_rgba();
            WebPEncoder::new_lossless(Cursor::new(&mut buf))
                .encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| ResizeError::encoding(format!("encode WebP: {e}")))?;
        }
    }

    if buf.is_empty() {
        return Err(ResizeError::encoding(format!(
            "{} encoder produced no data",
            format.label()
        )));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::TargetSpec;

    fn opaque_surface(w: u32, h: u32) -> Surface {
        let mut s = Surface::new(TargetSpec::new(w, h).unwrap());
        s.fill([30, 60, 90, 255]);
        s
    }

    #[test]
    fn transparent_background_coerces_jpeg_to_png() {
        let spec = ExportSpec::new(ExportFormat::Jpeg, 80);
        assert_eq!(
            spec.effective_format(Some(&Background::Transparent)),
            ExportFormat::Png
        );
        assert_eq!(spec.effective_format(None), ExportFormat::Jpeg);
        assert_eq!(
            spec.effective_format(Some(&Background::DEFAULT_FILL)),
            ExportFormat::Jpeg
        );
        let webp = ExportSpec::new(ExportFormat::WebP, 80);
        assert_eq!(
            webp.effective_format(Some(&Background::Transparent)),
            ExportFormat::WebP
        );
    }

    #[test]
    fn only_jpeg_takes_quality_and_lacks_alpha() {
        for format in ExportFormat::ALL {
            assert_eq!(format.uses_quality(), format == ExportFormat::Jpeg);
            assert_eq!(format.supports_alpha(), format != ExportFormat::Jpeg);
        }
    }

    #[test]
    fn quality_is_clamped() {
        assert_eq!(ExportSpec::new(ExportFormat::Jpeg, 0).quality(), 1);
        assert_eq!(ExportSpec::new(ExportFormat::Jpeg, 250).quality(), 100);
        assert_eq!(ExportSpec::default().quality(), DEFAULT_QUALITY);
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("webp".parse::<ExportFormat>().unwrap(), ExportFormat::WebP);
        assert!("gif".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::WebP.extension(), "webp");
        assert_eq!(ExportFormat::Jpeg.mime(), "image/jpeg");
    }

    #[test]
    fn every_format_round_trips_dimensions() {
        let s = opaque_surface(13, 7);
        for format in ExportFormat::ALL {
            let bytes = encode_surface(&s, format, 90).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (13, 7), "{format}");
            assert_eq!(
                image::guess_format(&bytes).unwrap(),
                match format {
                    ExportFormat::Jpeg => image::ImageFormat::Jpeg,
                    ExportFormat::Png => image::ImageFormat::Png,
                    ExportFormat::WebP => image::ImageFormat::WebP,
                }
            );
        }
    }

    #[test]
    fn png_is_pixel_exact_for_opaque_input() {
        let s = opaque_surface(4, 4);
        let bytes = encode_surface(&s, ExportFormat::Png, 100).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert!(decoded.pixels().all(|p| p.0 == [30, 60, 90, 255]));
    }

    #[test]
    fn lower_jpeg_quality_is_smaller_on_noisy_input() {
        let mut s = Surface::new(TargetSpec::new(64, 64).unwrap());
        for (i, px) in s.data_mut().chunks_exact_mut(4).enumerate() {
            let v = ((i * 7919) % 251) as u8;
            px.copy_from_slice(&[v, v.wrapping_mul(3), v.wrapping_mul(7), 255]);
        }
        let hi = encode_surface(&s, ExportFormat::Jpeg, 100).unwrap();
        let lo = encode_surface(&s, ExportFormat::Jpeg, 10).unwrap();
        assert!(lo.len() < hi.len());
    }
}
