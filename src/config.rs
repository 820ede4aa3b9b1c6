//! JSON job configuration.
//!
//! ```json
//! {
//!   "size_preset": "instagram-portrait",
//!   "crop": "top",
//!   "background": "#1D4BB7:#DFE7EF",
//!   "format": "jpeg",
//!   "quality": 85,
//!   "archive_prefix": "team"
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{ImageSource, decode_image};
use crate::encode::archive::DEFAULT_ARCHIVE_PREFIX;
use crate::encode::export::{DEFAULT_QUALITY, ExportFormat, ExportSpec};
use crate::foundation::core::{CropMode, TargetSpec};
use crate::foundation::error::{ResizeError, ResizeResult};
use crate::presets::{find_size_preset, resolve_background};
use crate::render::compositor::CompositeSettings;

/// Target used when neither a preset nor explicit dimensions are configured.
pub const DEFAULT_SIZE: (u32, u32) = (500, 500);

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size_preset: Option<String>,
    pub crop: Option<CropMode>,
    /// Preset slug/label or background text.
    pub background: Option<String>,
    /// Image file cover-fitted behind the source in fill mode.
    pub background_image: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub quality: Option<u8>,
    pub archive_prefix: Option<String>,
}

impl BatchConfig {
    pub fn from_json_str(s: &str) -> ResizeResult<Self> {
        serde_json::from_str(s).map_err(|e| ResizeError::config(format!("parse config JSON: {e}")))
    }

    pub fn load(path: &Path) -> ResizeResult<Self> {
        let f = File::open(path).map_err(|e| {
            ResizeError::config(format!("open config '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            ResizeError::config(format!("parse config '{}': {e}", path.display()))
        })
    }

    /// Fields set in `overrides` win over `self`.
    ///
    /// Explicit dimensions and a size preset are mutually exclusive, so setting one in
    /// `overrides` clears the other. The same holds for `background` and
    /// `background_image`.
    pub fn merged(self, overrides: BatchConfig) -> BatchConfig {
        let explicit_size = overrides.width.is_some() || overrides.height.is_some();
        let (width, height, size_preset) = if explicit_size {
            (
                overrides.width.or(self.width),
                overrides.height.or(self.height),
                None,
            )
        } else if overrides.size_preset.is_some() {
            (None, None, overrides.size_preset)
        } else {
            (self.width, self.height, self.size_preset)
        };

        let (background, background_image) =
            if overrides.background.is_some() || overrides.background_image.is_some() {
                (overrides.background, overrides.background_image)
            } else {
                (self.background, self.background_image)
            };

        BatchConfig {
            width,
            height,
            size_preset,
            crop: overrides.crop.or(self.crop),
            background,
            background_image,
            format: overrides.format.or(self.format),
            quality: overrides.quality.or(self.quality),
            archive_prefix: overrides.archive_prefix.or(self.archive_prefix),
        }
    }

    pub fn target(&self) -> ResizeResult<TargetSpec> {
        if let Some(key) = &self.size_preset {
            if self.width.is_some() || self.height.is_some() {
                return Err(ResizeError::config(
                    "size_preset cannot be combined with width/height",
                ));
            }
            let preset = find_size_preset(key)
                .ok_or_else(|| ResizeError::config(format!("unknown size preset \"{key}\"")))?;
            return preset.target();
        }

        match (self.width, self.height) {
            (Some(w), Some(h)) => TargetSpec::new(w, h),
            (None, None) => TargetSpec::new(DEFAULT_SIZE.0, DEFAULT_SIZE.1),
            _ => Err(ResizeError::invalid_target(
                "width and height must be given together",
            )),
        }
    }

    pub fn archive_prefix(&self) -> &str {
        self.archive_prefix
            .as_deref()
            .unwrap_or(DEFAULT_ARCHIVE_PREFIX)
    }

    /// Validate into compositing settings.
    pub fn to_settings(&self) -> ResizeResult<CompositeSettings> {
        let target = self.target()?;
        let background = self
            .background
            .as_deref()
            .map(resolve_background)
            .transpose()?;
        let backdrop = self
            .background_image
            .as_deref()
            .map(load_backdrop)
            .transpose()?;
        if background.is_some() && backdrop.is_some() {
            return Err(ResizeError::config(
                "background cannot be combined with background_image",
            ));
        }
        let export = ExportSpec::new(
            self.format.unwrap_or_default(),
            self.quality.unwrap_or(DEFAULT_QUALITY),
        );

        Ok(CompositeSettings::new(target)
            .with_crop(self.crop.unwrap_or_default())
            .with_background(background)
            .with_backdrop(backdrop)
            .with_export(export))
    }
}

fn load_backdrop(path: &Path) -> ResizeResult<Arc<ImageSource>> {
    let bytes = std::fs::read(path).map_err(|e| {
        ResizeError::config(format!("read background image '{}': {e}", path.display()))
    })?;
    let image = decode_image(&bytes).map_err(|e| {
        ResizeError::config(format!("background image '{}': {e}", path.display()))
    })?;
    Ok(Arc::new(image))
}
