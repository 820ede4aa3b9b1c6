//! Sequential batch driver.
//!
//! A [`Batch`] is a lazy iterator: each call to `next` loads, decodes, composites and
//! encodes exactly one input, so at most one decoded image is alive at a time. Failures
//! are yielded as [`ItemFailure`] values and never stop the iteration.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::assets::decode::decode_image;
use crate::encode::export::ExportFormat;
use crate::foundation::error::{ResizeError, ResizeResult};
use crate::render::compositor::{CompositeResult, CompositeSettings, composite};

/// File extensions picked up by [`collect_files`].
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "tiff", "tif", "bmp", "gif"];

/// A named input whose bytes are produced on demand.
pub trait BatchInput {
    /// Display name, also used to derive the output name.
    fn name(&self) -> &str;

    /// Produce the encoded image bytes.
    fn load(self) -> ResizeResult<Vec<u8>>
    where
        Self: Sized;
}

/// In-memory input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputItem {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputItem {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl BatchInput for InputItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(self) -> ResizeResult<Vec<u8>> {
        Ok(self.bytes)
    }
}

/// Input read from disk when the batch reaches it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInput {
    path: PathBuf,
    name: String,
}

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

impl BatchInput for FileInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(self) -> ResizeResult<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// A failed item; the batch carries on past it.
#[derive(thiserror::Error, Debug)]
#[error("{name}: {error}")]
pub struct ItemFailure {
    /// 0-based position in the input sequence.
    pub index: usize,
    pub name: String,
    #[source]
    pub error: ResizeError,
}

pub type ItemOutcome = Result<CompositeResult, ItemFailure>;

/// Running totals for a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_bytes: u64,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.total += 1;
        match outcome {
            Ok(result) => {
                self.succeeded += 1;
                self.total_bytes += result.byte_size as u64;
            }
            Err(_) => self.failed += 1,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} processed ({} total)",
            self.succeeded,
            self.total,
            format_total_size(self.total_bytes)
        )
    }
}

/// `12.3 KB`, as shown for a single item.
pub fn format_item_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Whole KB below 1 MB, one decimal MB above.
pub fn format_total_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{kb:.0} KB")
    } else {
        format!("{:.1} MB", kb / 1024.0)
    }
}

/// Lazy, finite, single-pass iterator over batch outcomes.
pub struct Batch<I> {
    settings: CompositeSettings,
    inputs: I,
    index: usize,
    summary: BatchSummary,
}

impl<I> Batch<I>
where
    I: Iterator,
    I::Item: BatchInput,
{
    pub fn new(settings: CompositeSettings, inputs: impl IntoIterator<IntoIter = I>) -> Self {
        let background = match (&settings.backdrop, &settings.background) {
            (Some(backdrop), _) => format!("image {}x{}", backdrop.width(), backdrop.height()),
            (None, Some(background)) => background.to_string(),
            (None, None) => "default".to_owned(),
        };
        let format = settings.effective_format();
        let quality = format
            .uses_quality()
            .then(|| settings.export.quality().to_string())
            .unwrap_or_else(|| "lossless".to_owned());
        tracing::info!(
            size = %settings.target,
            crop = %settings.crop,
            format = %format,
            quality = %quality,
            background = %background,
            "starting batch"
        );
        if settings.export.format == ExportFormat::Jpeg
            && settings.effective_format() == ExportFormat::Png
        {
            tracing::warn!("transparent background with JPEG, writing PNG instead");
        }

        Self {
            settings,
            inputs: inputs.into_iter(),
            index: 0,
            summary: BatchSummary::default(),
        }
    }

    pub fn settings(&self) -> &CompositeSettings {
        &self.settings
    }

    /// Totals over the items yielded so far.
    pub fn summary(&self) -> BatchSummary {
        self.summary
    }

    /// Drain the batch, returning every outcome and the final summary.
    pub fn run(mut self) -> (Vec<ItemOutcome>, BatchSummary) {
        let outcomes: Vec<_> = self.by_ref().collect();
        (outcomes, self.summary)
    }
}

impl<I> Iterator for Batch<I>
where
    I: Iterator,
    I::Item: BatchInput,
{
    type Item = ItemOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.inputs.next()?;
        let index = self.index;
        self.index += 1;

        let name = input.name().to_owned();
        let outcome = process_one(input, &name, &self.settings).map_err(|error| ItemFailure {
            index,
            name: name.clone(),
            error,
        });

        match &outcome {
            Ok(result) => tracing::info!(
                item = index + 1,
                input = %name,
                output = %result.name,
                size = %format_item_size(result.byte_size as u64),
                "ok"
            ),
            Err(failure) => tracing::warn!(
                item = index + 1,
                input = %name,
                error = %failure.error,
                "failed"
            ),
        }

        self.summary.record(&outcome);
        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inputs.size_hint()
    }
}

fn process_one(
    input: impl BatchInput,
    name: &str,
    settings: &CompositeSettings,
) -> ResizeResult<CompositeResult> {
    let bytes = input.load()?;
    let source = decode_image(&bytes)?;
    drop(bytes);
    composite(&source, name, settings)
}

/// List supported image files directly inside `dir`, sorted by file name.
pub fn collect_files(dir: &Path) -> ResizeResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `true` when the extension is in [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}
