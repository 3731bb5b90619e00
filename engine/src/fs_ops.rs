//! Filesystem operations module.
//!
//! This module provides the blocking filesystem work of a run:
//! - Validating the source and preparing the destination
//! - Walking the source tree into a job plan (discovery)
//! - Listing the destination into a name set (inventory)
//! - Copying a single job's bytes

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::EngineError;
use crate::logger::Logger;
use crate::model::{CopyJob, JobPlan};
use crate::progress::Counters;

/// Check that `source` exists and is a directory.
pub fn validate_source(source: &Path) -> Result<(), EngineError> {
    match fs::metadata(source) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(EngineError::SourceNotDirectory {
            path: source.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(EngineError::SourceNotFound {
            path: source.to_path_buf(),
        }),
        Err(e) => Err(EngineError::SourceAccessDenied {
            path: source.to_path_buf(),
            source: e,
        }),
    }
}

/// Make sure `destination` is a directory, creating it (and its parents) if missing.
///
/// Returns true if the directory was created by this call.
pub fn prepare_destination(destination: &Path) -> Result<bool, EngineError> {
    match fs::metadata(destination) {
        Ok(metadata) if metadata.is_dir() => Ok(false),
        Ok(_) => Err(EngineError::DestinationNotDirectory {
            path: destination.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(destination).map_err(|e| EngineError::DestinationCreateFailed {
                path: destination.to_path_buf(),
                source: e,
            })?;
            Ok(true)
        }
        Err(e) => Err(EngineError::DestinationCreateFailed {
            path: destination.to_path_buf(),
            source: e,
        }),
    }
}

/// Walk `source` recursively and build one job per regular file.
///
/// Entries that vanish, cannot be read, or whose size cannot be determined are
/// skipped. An error on the root itself stops the walk; it is logged and the
/// jobs collected so far are kept. `counters` is bumped for every job added so
/// a spinner can follow along.
pub fn discover(source: &Path, destination: &Path, counters: &Counters, logger: &Logger) -> JobPlan {
    let mut plan = JobPlan::default();

    for entry in WalkDir::new(source) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                logger.log(format!("HATA (Discovery): {}", err));
                break;
            }
            Err(_) => continue,
        };
        if entry.file_type().is_dir() {
            continue;
        }

        // Follows symlinks, so a link to a regular file counts as one.
        let size = match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            _ => continue,
        };
        if let Some(job) = CopyJob::new(entry.into_path(), destination, size) {
            plan.push(job);
            counters.record_discovered();
        }
    }

    plan
}

/// List the base names of the regular files directly inside `destination`.
///
/// Names are kept as raw `OsString`s so lookups compare the exact bytes.
/// An entry that cannot be inspected is left out. If the directory itself
/// cannot be listed, a warning is logged and the set comes back empty.
pub fn scan_destination(destination: &Path, logger: &Logger) -> HashSet<OsString> {
    let mut names = HashSet::new();

    if let Err(e) = collect_file_names(destination, &mut names) {
        logger.log(format!(
            "UYARI: Hedef dizin okunurken hata olustu: {}",
            EngineError::EnumerationFailed {
                path: destination.to_path_buf(),
                source: e,
            }
        ));
    }

    names
}

fn collect_file_names(dir: &Path, names: &mut HashSet<OsString>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let is_file = match entry.file_type() {
            Ok(t) if t.is_symlink() => fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false),
            Ok(t) => t.is_file(),
            Err(_) => false,
        };
        if is_file {
            names.insert(entry.file_name());
        }
    }
    Ok(())
}

/// Copy one job's bytes, replacing the destination file if it exists.
///
/// # Returns
/// Number of bytes copied
pub fn copy_job_file(job: &CopyJob) -> Result<u64, EngineError> {
    fs::copy(&job.source_path, &job.destination_path).map_err(|e| EngineError::CopyFailed {
        path: job.source_path.clone(),
        source: e,
    })
}
