//! The compositing pipeline: background, scaled source, encode.

use std::path::Path;
use std::sync::Arc;

use image::imageops::{self, FilterType};

use crate::assets::decode::ImageSource;
use crate::encode::export::{ExportFormat, ExportSpec, encode_surface};
use crate::foundation::core::{CropMode, TargetSpec};
use crate::foundation::error::ResizeResult;
use crate::paint::background::Background;
use crate::paint::painter::paint;
use crate::render::blend::draw_image;
use crate::render::geometry::Placement;
use crate::render::surface::Surface;

/// Per-batch compositing parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeSettings {
    pub target: TargetSpec,
    pub crop: CropMode,
    /// Padding fill for [`CropMode::Fill`]; `None` means opaque white.
    pub background: Option<Background>,
    /// Image cover-fitted behind the source in [`CropMode::Fill`]. Takes precedence over
    /// `background`.
    pub backdrop: Option<Arc<ImageSource>>,
    pub export: ExportSpec,
}

impl CompositeSettings {
    pub fn new(target: TargetSpec) -> Self {
        Self {
            target,
            crop: CropMode::default(),
            background: None,
            backdrop: None,
            export: ExportSpec::default(),
        }
    }

    pub fn with_crop(mut self, crop: CropMode) -> Self {
        self.crop = crop;
        self
    }

    pub fn with_background(mut self, background: Option<Background>) -> Self {
        self.background = background;
        self
    }

    pub fn with_backdrop(mut self, backdrop: Option<Arc<ImageSource>>) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn with_export(mut self, export: ExportSpec) -> Self {
        self.export = export;
        self
    }

    pub fn effective_format(&self) -> ExportFormat {
        let background = match self.backdrop {
            Some(_) => None,
            None => self.background.as_ref(),
        };
        self.export.effective_format(background)
    }
}

/// One encoded output image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeResult {
    pub bytes: Vec<u8>,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub byte_size: usize,
}

/// Paint the background (fill mode only) and draw the scaled source.
pub fn render(source: &ImageSource, settings: &CompositeSettings) -> Surface {
    let mut surface = Surface::new(settings.target);

    if settings.crop == CropMode::Fill {
        match &settings.backdrop {
            Some(backdrop) => {
                draw_fitted(&mut surface, backdrop, settings.target, CropMode::Center)
            }
            None => {
                let background = settings
                    .background
                    .as_ref()
                    .unwrap_or(&Background::DEFAULT_FILL);
                paint(&mut surface, background);
            }
        }
    }

    draw_fitted(&mut surface, source, settings.target, settings.crop);
    surface
}

/// Resample `source` to its placement for `crop` and draw it over `surface`.
fn draw_fitted(surface: &mut Surface, source: &ImageSource, target: TargetSpec, crop: CropMode) {
    let placement = Placement::compute(source.width(), source.height(), target, crop);
    let (w, h) = placement.pixel_size();
    let (x, y) = placement.pixel_origin();

    let resized;
    let pixels = if (w, h) == (source.width(), source.height()) {
        source.premultiplied()
    } else {
        resized = imageops::resize(source.premultiplied(), w, h, FilterType::Lanczos3);
        &resized
    };
    draw_image(surface, pixels, x, y);
}

/// Composite `source` per `settings` and encode it, naming the result after `name`.
#[tracing::instrument(
    level = "debug",
    skip(source, settings),
    fields(
        src_w = source.width(),
        src_h = source.height(),
        size = %settings.target,
        crop = %settings.crop
    )
)]
pub fn composite(
    source: &ImageSource,
    name: &str,
    settings: &CompositeSettings,
) -> ResizeResult<CompositeResult> {
    let surface = render(source, settings);
    let format = settings.effective_format();
    let bytes = encode_surface(&surface, format, settings.export.quality())?;

    Ok(CompositeResult {
        byte_size: bytes.len(),
        bytes,
        name: output_name(name, format),
        width: surface.width(),
        height: surface.height(),
        format,
    })
}

/// Replace the extension of `name` with the canonical one for `format`.
pub fn output_name(name: &str, format: ExportFormat) -> String {
    let file_name = Path::new(name)
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_else(|| name.into());
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => &file_name[..],
    };
    format!("{stem}.{}", format.extension())
}
