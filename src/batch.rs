//! Batch conversion of a directory tree.
//!
//! Walks the source directory, plans one conversion per supported image and
//! runs them in parallel. The output tree mirrors the source tree; only the
//! file extension changes to match the configured format.
//!
//! ```text
//! photos/                     out/
//! ├── config.toml             ├── 001-dawn.jpg
//! ├── 001-dawn.jpg      →     └── travel/
//! └── travel/                     └── rome.jpg
//!     └── rome.png
//! ```
//!
//! ## Failure handling
//!
//! A file that fails to decode or encode does not stop the batch. Its error
//! is reported as a [`BatchEvent::Failed`] and collected in the
//! [`BatchResult`]. Only problems with the batch as a whole (unreadable
//! source directory, two sources mapping to the same output) abort early.
//!
//! ## Parallel Processing
//!
//! Conversions run on the global [rayon](https://docs.rs/rayon) pool. Size it
//! with `processing.max_processes` before calling [`batch`].

use crate::imaging::operations::convert_with_backend;
use crate::imaging::rust_backend::is_supported_input;
use crate::imaging::{ConvertConfig, ConvertError, ImageBackend, RustBackend};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("{} and {} would both be written to {}", first.display(), second.display(), output.display())]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },
}

/// One planned conversion: where to read and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Progress reported while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    Converted {
        /// 1-based position in the planned job list.
        index: usize,
        source: String,
        output: String,
    },
    Failed {
        index: usize,
        source: String,
        error: String,
    },
}

/// A single file that could not be converted.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub source: PathBuf,
    pub error: String,
}

/// Summary of a finished batch.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

impl std::fmt::Display for BatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} converted, {} failed",
            self.converted.len(),
            self.failed.len()
        )
    }
}

/// Find every decodable image under `source_root`, sorted by path.
///
/// Anything under `skip` (typically the output directory, when it lives
/// inside the source tree) is ignored, however that path is spelled.
pub fn discover_images(
    source_root: &Path,
    skip: Option<&Path>,
) -> Result<Vec<PathBuf>, BatchError> {
    if !source_root.is_dir() {
        return Err(BatchError::SourceNotFound(source_root.to_path_buf()));
    }

    let skip = match skip {
        Some(dir) => skip_path_in_walk(source_root, dir)?,
        None => None,
    };

    let mut images = Vec::new();
    let walker = WalkDir::new(source_root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| skip.as_deref().is_none_or(|s| entry.path() != s));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_input(entry.path()) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    Ok(images)
}

/// Re-express `skip` as the path walkdir will yield for it under `source_root`.
///
/// Both sides are canonicalized, so `./photos/out`, `photos/x/../out` and an
/// absolute spelling all match. A `skip` that does not exist yet, or lies
/// outside the source tree, cannot be walked into and yields `None`.
fn skip_path_in_walk(source_root: &Path, skip: &Path) -> Result<Option<PathBuf>, BatchError> {
    let Ok(skip) = skip.canonicalize() else {
        return Ok(None);
    };
    let root = source_root.canonicalize()?;
    Ok(skip
        .strip_prefix(&root)
        .ok()
        .map(|relative| source_root.join(relative)))
}

/// Map each source image to its output path under `output_root`.
///
/// Fails if two sources would produce the same output file
/// (e.g. `a.jpg` and `a.png` both becoming `a.jpg`).
pub fn plan_jobs(
    sources: &[PathBuf],
    source_root: &Path,
    output_root: &Path,
    config: &ConvertConfig,
) -> Result<Vec<BatchJob>, BatchError> {
    let mut seen: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut jobs = Vec::with_capacity(sources.len());

    for source in sources {
        let relative = source.strip_prefix(source_root).unwrap_or(source);
        let output = output_root
            .join(relative)
            .with_extension(config.format.extension());

        if let Some(first) = seen.insert(output.clone(), source.clone()) {
            return Err(BatchError::OutputCollision {
                first,
                second: source.clone(),
                output,
            });
        }
        jobs.push(BatchJob {
            source: source.clone(),
            output,
        });
    }
    Ok(jobs)
}

/// Convert every image under `source_root` into `output_root`.
pub fn batch(
    source_root: &Path,
    output_root: &Path,
    config: &ConvertConfig,
    progress: Option<Sender<BatchEvent>>,
) -> Result<BatchResult, BatchError> {
    batch_with_backend(&RustBackend::new(), source_root, output_root, config, progress)
}

/// Run a batch using a specific backend (allows testing with mock).
pub fn batch_with_backend(
    backend: &impl ImageBackend,
    source_root: &Path,
    output_root: &Path,
    config: &ConvertConfig,
    progress: Option<Sender<BatchEvent>>,
) -> Result<BatchResult, BatchError> {
    let sources = discover_images(source_root, Some(output_root))?;
    let jobs = plan_jobs(&sources, source_root, output_root, config)?;
    log::debug!(
        "batch: {} images from {} to {}",
        jobs.len(),
        source_root.display(),
        output_root.display()
    );
    send(&progress, BatchEvent::Started { total: jobs.len() });

    let outcomes: Vec<(&BatchJob, Result<(), ConvertError>)> = jobs
        .par_iter()
        .enumerate()
        .map(|(i, job)| {
            let outcome =
                convert_with_backend(backend, &job.source, &job.output, config).map(|_| ());
            let event = match &outcome {
                Ok(()) => BatchEvent::Converted {
                    index: i + 1,
                    source: display_relative(&job.source, source_root),
                    output: display_relative(&job.output, output_root),
                },
                Err(e) => {
                    log::warn!("skipping {}: {}", job.source.display(), e);
                    BatchEvent::Failed {
                        index: i + 1,
                        source: display_relative(&job.source, source_root),
                        error: e.to_string(),
                    }
                }
            };
            send(&progress, event);
            (job, outcome)
        })
        .collect();

    let mut result = BatchResult::default();
    for (job, outcome) in outcomes {
        match outcome {
            Ok(()) => result.converted.push(job.output.clone()),
            Err(e) => result.failed.push(BatchFailure {
                source: job.source.clone(),
                error: e.to_string(),
            }),
        }
    }
    Ok(result)
}

fn send(progress: &Option<Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = progress {
        // Receiver gone means nobody is listening; the batch carries on.
        let _ = tx.send(event);
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
