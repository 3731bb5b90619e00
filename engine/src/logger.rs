//! Run log shared by every stage of a copy.
//!
//! Each call to [`Logger::log`] writes one `[YYYY-MM-DD HH:MM:SS] message` line
//! to the console and to an append-mode log file. A single mutex serializes
//! writers, so lines never interleave; their order is the order in which the
//! lock was taken.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct Sinks {
    console: Option<Box<dyn Write + Send>>,
    file: Option<File>,
}

/// Thread-safe logger writing to console and file.
///
/// Constructed once by the caller and passed by reference into every task.
pub struct Logger {
    path: PathBuf,
    sinks: Mutex<Sinks>,
}

impl Logger {
    /// Open `path` for appending and log to stdout as well.
    ///
    /// If the file cannot be opened a warning is printed once and the logger
    /// keeps working console-only.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::with_console(path, Some(Box::new(io::stdout())))
    }

    /// Log to the file only; nothing is printed.
    pub fn quiet(path: impl AsRef<Path>) -> Self {
        Self::with_console(path, None)
    }

    /// Log to `path` and to an arbitrary console writer.
    pub fn with_console(path: impl AsRef<Path>, console: Option<Box<dyn Write + Send>>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("HATA: Log dosyasi acilamadi: {} ({})", path.display(), e);
                None
            }
        };
        Logger {
            path,
            sinks: Mutex::new(Sinks { console, file }),
        }
    }

    /// True if lines are reaching the log file.
    pub fn has_file(&self) -> bool {
        self.lock().file.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Sinks> {
        self.sinks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write one timestamped line. I/O errors are swallowed.
    pub fn log(&self, message: impl AsRef<str>) {
        let mut sinks = self.lock();
        let line = format!(
            "[{}] {}\n",
            Local::now().format(TIMESTAMP_FORMAT),
            message.as_ref()
        );

        if let Some(console) = sinks.console.as_mut() {
            let _ = console.write_all(line.as_bytes());
            let _ = console.flush();
        }
        if let Some(file) = sinks.file.as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("has_file", &self.has_file())
            .finish()
    }
}
