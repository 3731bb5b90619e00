//! Core data model for a copy run.
//!
//! - CopyOptions: what to copy and how the run is paced
//! - CopyJob: one regular file to copy into the flat destination
//! - JobPlan: the discovered job list and its total size
//! - FileOutcome: how a single job ended
//! - RunSummary: aggregate counts handed back to the caller

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use uuid::Uuid;

/// Default upper bound on copy workers.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Default name of the append-only run log.
pub const DEFAULT_LOG_FILE: &str = "flatcopy.log";

/// Settings for a single run.
///
/// There is no config file or flag surface; callers build this in code and
/// override the pacing knobs when they need to (tests shorten the intervals).
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Root of the tree to copy from
    pub source: PathBuf,

    /// Flat directory every file lands in
    pub destination: PathBuf,

    /// Upper bound on the worker pool; the real size is also capped by the CPU count
    pub max_workers: usize,

    /// Tick of the discovery spinner
    pub spinner_interval: Duration,

    /// Tick of the copy progress line
    pub progress_interval: Duration,

    /// Throughput (MB/s) below which no ETA is computed
    pub eta_speed_floor: f64,
}

impl CopyOptions {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        CopyOptions {
            source: source.into(),
            destination: destination.into(),
            max_workers: DEFAULT_MAX_WORKERS,
            spinner_interval: Duration::from_millis(100),
            progress_interval: Duration::from_secs(1),
            eta_speed_floor: 0.01,
        }
    }

    /// Number of workers to spawn: `min(max_workers, available parallelism)`, at least 1.
    pub fn worker_count(&self) -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.max_workers.min(cpus).max(1)
    }
}

/// One file to copy.
///
/// Created once per discovered regular file and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    /// Full source path
    pub source_path: PathBuf,

    /// Destination directory joined with the source's base name
    pub destination_path: PathBuf,

    /// Size in bytes as seen during discovery
    pub file_size: u64,
}

impl CopyJob {
    pub fn new(source_path: PathBuf, destination_dir: &Path, file_size: u64) -> Option<Self> {
        let name = source_path.file_name()?.to_owned();
        Some(CopyJob {
            destination_path: destination_dir.join(name),
            source_path,
            file_size,
        })
    }

    /// Base name of the destination file, byte-exact, used for inventory lookups.
    pub fn destination_name(&self) -> &OsStr {
        self.destination_path.file_name().unwrap_or_default()
    }

    /// Base name of the source file for log lines; not safe for comparisons.
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of discovery: the ordered job list and the sum of their sizes.
///
/// Append-only while discovery runs, read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct JobPlan {
    pub jobs: Vec<CopyJob>,
    pub total_bytes: u64,
}

impl JobPlan {
    pub fn push(&mut self, job: CopyJob) {
        self.total_bytes += job.file_size;
        self.jobs.push(job);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// How a single job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Bytes were written to the destination
    Copied,
    /// Destination name was already in the inventory
    Skipped,
    /// Copy attempt failed; the reason was logged
    Failed,
}

/// Aggregate result of a run, built from the shared counters.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifier logged at the start of the run
    pub run_id: Uuid,

    /// Regular files found during discovery
    pub discovered: u64,

    /// Sum of the discovered file sizes
    pub total_bytes: u64,

    /// Names present in the destination before copying started
    pub existing_at_destination: usize,

    /// Jobs taken off the queue and finished (copied + skipped + failed)
    pub processed: u64,

    pub copied: u64,
    pub skipped: u64,
    pub failed: u64,

    /// Bytes of successfully copied files
    pub bytes_copied: u64,

    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl RunSummary {
    pub(crate) fn empty(run_id: Uuid) -> Self {
        RunSummary {
            run_id,
            discovered: 0,
            total_bytes: 0,
            existing_at_destination: 0,
            processed: 0,
            copied: 0,
            skipped: 0,
            failed: 0,
            bytes_copied: 0,
            elapsed: Duration::ZERO,
        }
    }
}
