//! Output delivery to disk.
//!
//! Writes are atomic: bytes go to a temporary sibling file which is then
//! renamed over the destination. The blocking file I/O runs on a worker
//! thread so callers on the async runtime are not stalled.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::OutputError;

/// Options for writing output files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Number of bytes written.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

/// Writes output blobs to disk.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Write `bytes` to `dir/name`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::InvalidName`] if `name` is empty or contains a
    /// path separator, and [`OutputError::FailedToWrite`] if any file
    /// operation fails.
    pub async fn save(
        &self,
        bytes: impl AsRef<[u8]> + Send + 'static,
        dir: &Path,
        name: &str,
    ) -> Result<WriteStatistics, OutputError> {
        let path = output_path(dir, name)?;
        let options = self.options.clone();

        let stats = task::spawn_blocking(move || write_file(bytes.as_ref(), &path, &options))
            .await
            .map_err(|e| OutputError::Task(e.to_string()))??;

        tracing::info!(
            path = %stats.output_path.display(),
            bytes = stats.file_size,
            "Wrote output file"
        );

        Ok(stats)
    }
}

/// Join `dir` and a user-supplied file name, rejecting names that would
/// escape `dir`.
pub fn output_path(dir: &Path, name: &str) -> Result<PathBuf, OutputError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        return Err(OutputError::InvalidName {
            name: name.to_string(),
        });
    }

    Ok(dir.join(trimmed))
}

/// Turn a suggested name into one [`output_path`] accepts.
///
/// Path separators become `_`. Returns `None` when nothing usable is left.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let cleaned = name.trim().replace(['/', '\\'], "_");
    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

fn write_file(
    bytes: &[u8],
    path: &Path,
    options: &WriteOptions,
) -> Result<WriteStatistics, OutputError> {
    let start = Instant::now();

    let write_path = if options.atomic {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    } else {
        path.to_path_buf()
    };

    let failed = |source| OutputError::FailedToWrite {
        path: write_path.clone(),
        source,
    };

    let file = std::fs::File::create(&write_path).map_err(failed)?;
    let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);
    writer.write_all(bytes).map_err(failed)?;
    writer.flush().map_err(failed)?;
    drop(writer);

    if options.atomic {
        std::fs::rename(&write_path, path).map_err(|source| OutputError::FailedToWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(WriteStatistics {
        write_time: start.elapsed(),
        file_size: bytes.len() as u64,
        output_path: path.to_path_buf(),
    })
}
