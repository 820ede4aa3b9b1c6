use std::collections::HashSet;
use std::io::{Seek, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::foundation::core::TargetSpec;
use crate::foundation::error::{ResizeError, ResizeResult};
use crate::render::compositor::CompositeResult;

/// Default archive prefix.
pub const DEFAULT_ARCHIVE_PREFIX: &str = "resized";

/// `{prefix}-{width}x{height}.zip`
pub fn archive_name(prefix: &str, target: TargetSpec) -> String {
    let prefix = prefix.trim();
    let prefix = if prefix.is_empty() {
        DEFAULT_ARCHIVE_PREFIX
    } else {
        prefix
    };
    format!("{prefix}-{target}.zip")
}

/// Hands out output names, suffixing repeats with ` (n)` before the extension.
#[derive(Clone, Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Reserve `name`, or the first free ` (n)` variant of it.
    pub fn claim(&mut self, name: &str) -> String {
        let unique = unique_name(&self.taken, name);
        self.taken.insert(unique.clone());
        unique
    }
}

/// Streams composite results into a zip archive, one entry per result.
///
/// Entries are stored uncompressed since every payload is already a compressed image.
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    names: UniqueNames,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            names: UniqueNames::new(),
        }
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append `result`, returning the entry name actually used.
    ///
    /// Colliding names get a ` (n)` suffix before the extension.
    pub fn add(&mut self, result: &CompositeResult) -> ResizeResult<String> {
        let entry = self.names.claim(&result.name);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        self.zip
            .start_file(entry.as_str(), options)
            .map_err(|e| ResizeError::archive(format!("start entry '{entry}': {e}")))?;
        self.zip
            .write_all(&result.bytes)
            .map_err(|e| ResizeError::archive(format!("write entry '{entry}': {e}")))?;

        Ok(entry)
    }

    /// Write the central directory and hand back the underlying writer.
    pub fn finish(self) -> ResizeResult<W> {
        self.zip
            .finish()
            .map_err(|e| ResizeError::archive(format!("finish archive: {e}")))
    }
}

/// Package `results` into a new archive written to `inner`.
pub fn write_archive<'a, W: Write + Seek>(
    inner: W,
    results: impl IntoIterator<Item = &'a CompositeResult>,
) -> ResizeResult<W> {
    let mut writer = ArchiveWriter::new(inner);
    for result in results {
        writer.add(result)?;
    }
    writer.finish()
}

fn unique_name(taken: &HashSet<String>, name: &str) -> String {
    if !taken.contains(name) {
        return name.to_owned();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    };
    (1..)
        .map(|n| format!("{stem} ({n}){ext}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_owned())
}
