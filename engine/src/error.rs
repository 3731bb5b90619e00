//! Error types for the copy engine.
//!
//! `EngineError` covers the failures that stop a run before any work is done
//! (invalid source, unusable destination). Failures of a single directory entry
//! or a single copy job are logged where they happen and never surface here;
//! the orchestrator only ever sees aggregate counts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the engine's filesystem operations.
///
/// Only the pre-flight variants (`Source*`, `Destination*`) escape
/// [`crate::run_copy`]. `EnumerationFailed` and `CopyFailed` are produced by the
/// lower-level helpers and turned into log lines by the stage that called them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Source directory does not exist
    #[error("Kaynak dizin bulunamadi: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// Source path exists but is a file or something else
    #[error("Kaynak yol bir dizin degil: {}", .path.display())]
    SourceNotDirectory { path: PathBuf },

    /// Source metadata could not be read
    #[error("Kaynak dizine erisilemedi: {}: {source}", .path.display())]
    SourceAccessDenied { path: PathBuf, source: io::Error },

    /// Destination path exists but is not a directory
    #[error("Hedef yol mevcut ancak bir dizin degil: {}", .path.display())]
    DestinationNotDirectory { path: PathBuf },

    /// Destination directory could not be created or inspected
    #[error("Hedef dizin olusturulamadi: {}: {source}", .path.display())]
    DestinationCreateFailed { path: PathBuf, source: io::Error },

    /// A directory walk or listing failed at the top level
    #[error("Dizin okunamadi: {}: {source}", .path.display())]
    EnumerationFailed { path: PathBuf, source: io::Error },

    /// A single file could not be copied
    #[error("{} kopyalanamadi. Sebep: {source}", .path.display())]
    CopyFailed { path: PathBuf, source: io::Error },
}

impl EngineError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::SourceAccessDenied { source, .. }
            | Self::DestinationCreateFailed { source, .. }
            | Self::EnumerationFailed { source, .. }
            | Self::CopyFailed { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_failed_message_names_path_and_reason() {
        let err = EngineError::CopyFailed {
            path: PathBuf::from("/src/a.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/src/a.txt"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_raw_os_error_passthrough() {
        let err = EngineError::EnumerationFailed {
            path: PathBuf::from("/x"),
            source: io::Error::from_raw_os_error(13),
        };
        assert_eq!(err.raw_os_error(), Some(13));

        let err = EngineError::SourceNotFound { path: PathBuf::from("/x") };
        assert_eq!(err.raw_os_error(), None);
    }
}
