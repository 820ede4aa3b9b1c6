//! batchframe resizes batches of images to one target size.
//!
//! Each image is scaled to cover the target (cropping the overflow, anchored to the top
//! or the center) or to fit inside it (padding the rest with a solid color, a gradient,
//! or transparency), then encoded as JPEG, PNG or WebP.
//!
//! - Build [`CompositeSettings`] once per batch, directly or from a [`BatchConfig`]
//! - Drive a [`Batch`] over named inputs and consume the outcomes in order
//! - Write results to disk or into a zip with [`ArchiveWriter`]
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod batch;
pub mod config;
pub mod encode;
pub mod paint;
pub mod presets;
pub mod render;

pub use crate::foundation::core::{CropMode, Point, Rect, TargetSpec, Vec2};
pub use crate::foundation::error::{ResizeError, ResizeResult};

pub use crate::assets::decode::{ImageSource, decode_image};
pub use crate::batch::{
    Batch, BatchInput, BatchSummary, FileInput, InputItem, ItemFailure, ItemOutcome,
    collect_files,
};
pub use crate::config::BatchConfig;
pub use crate::encode::archive::{ArchiveWriter, UniqueNames, archive_name, write_archive};
pub use crate::encode::export::{ExportFormat, ExportSpec, encode_surface};
pub use crate::paint::background::{
    Background, BackgroundParseError, Gradient, GradientDirection, parse_background,
};
pub use crate::paint::color::Rgba8;
pub use crate::paint::painter::paint;
pub use crate::render::compositor::{
    CompositeResult, CompositeSettings, composite, output_name, render,
};
pub use crate::render::geometry::Placement;
pub use crate::render::surface::Surface;
