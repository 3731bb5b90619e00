//! # flatcopy engine - concurrent flat directory copier
//!
//! Copies every regular file found under a source tree into a single flat
//! destination directory. Files whose name already exists at the destination
//! are skipped; everything else is copied by a small pool of worker threads.
//!
//! ## Overview
//!
//! A run goes through four phases, each finished before the next starts:
//! - Pre-flight: the source must be a directory, the destination is created if missing
//! - Discovery: the source tree is walked into a job list with its total size
//! - Inventory: the destination is listed once into an in-memory skip-set
//! - Copy: a bounded worker pool drains a blocking job queue
//!
//! A spinner follows discovery and a throughput/ETA line follows the copy.
//! Every action is written to a timestamped run log.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{run_copy, CopyOptions, Logger};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let logger = Logger::open("flatcopy.log");
//! let options = CopyOptions::new("/data/photos", "/backup/flat");
//!
//! let summary = run_copy(&options, &logger)?;
//! println!(
//!     "{} copied, {} skipped, {} failed",
//!     summary.copied, summary.skipped, summary.failed
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Run options, copy jobs, outcomes and the run summary
//! - **error**: Error types and handling
//! - **queue**: Blocking job queue with a close signal
//! - **fs_ops**: Pre-flight checks, discovery, inventory and single-file copy
//! - **pool**: Copy worker pool
//! - **progress**: Shared counters and terminal reporters
//! - **logger**: Timestamped console + file log
//! - **format**: Byte and ETA formatting
//! - **job**: Run orchestration

pub mod error;
pub mod format;
pub mod fs_ops;
pub mod job;
pub mod logger;
pub mod model;
pub mod pool;
pub mod progress;
pub mod queue;

// Re-export main types and functions
pub use error::EngineError;
pub use format::{format_bytes, format_eta};
pub use job::{run_copy, run_copy_to};
pub use logger::Logger;
pub use model::{CopyJob, CopyOptions, FileOutcome, JobPlan, RunSummary, DEFAULT_LOG_FILE};
pub use progress::{Counters, DoneSignal, Snapshot};
pub use queue::{JobQueue, JobSource};
