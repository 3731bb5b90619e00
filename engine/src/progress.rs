//! Shared run counters and the two terminal progress reporters.
//!
//! Workers and the discovery walker bump [`Counters`] with atomic adds.
//! Reporters run on their own threads, sample a [`Snapshot`] once per tick
//! and redraw a single `\r`-prefixed line until their [`DoneSignal`] fires.
//! Throughput is therefore a coarse sampling estimate, one sample per tick.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::format::{format_bytes, format_eta};
use crate::model::FileOutcome;

const SPINNER_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Counters shared by every thread of a run.
#[derive(Debug, Default)]
pub struct Counters {
    discovered: AtomicU64,
    processed: AtomicU64,
    copied: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    bytes_copied: AtomicU64,
}

/// Point-in-time copy of [`Counters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub discovered: u64,
    pub processed: u64,
    pub copied: u64,
    pub skipped: u64,
    pub failed: u64,
    pub bytes_copied: u64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_discovered(&self) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one finished job. `bytes` only counts toward the total for `Copied`.
    ///
    /// Bytes are added before the processed count, so a reader that sees a job
    /// as processed also sees its bytes.
    pub fn record(&self, outcome: FileOutcome, bytes: u64) {
        match outcome {
            FileOutcome::Copied => {
                self.bytes_copied.fetch_add(bytes, Ordering::Relaxed);
                self.copied.fetch_add(1, Ordering::Relaxed);
            }
            FileOutcome::Skipped => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            FileOutcome::Failed => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.processed.fetch_add(1, Ordering::Release);
    }

    pub fn discovered(&self) -> u64 {
        self.discovered.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Snapshot {
        let processed = self.processed.load(Ordering::Acquire);
        Snapshot {
            discovered: self.discovered.load(Ordering::Relaxed),
            processed,
            copied: self.copied.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes_copied: self.bytes_copied.load(Ordering::Relaxed),
        }
    }
}

/// One-shot completion flag a reporter can wait on with a timeout.
#[derive(Debug, Default)]
pub struct DoneSignal {
    done: Mutex<bool>,
    cond: Condvar,
}

impl DoneSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as done and wake every waiter.
    pub fn set(&self) {
        let mut done = self.done.lock().unwrap_or_else(|p| p.into_inner());
        *done = true;
        drop(done);
        self.cond.notify_all();
    }

    /// Guard that sets the signal when dropped, including during unwinding.
    pub fn set_on_drop(&self) -> DoneGuard<'_> {
        DoneGuard { signal: self }
    }

    /// Wait up to `timeout` for the signal. Returns true once it is set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.done.lock().unwrap_or_else(|p| p.into_inner());
        let (guard, _) = self
            .cond
            .wait_timeout_while(guard, timeout, |done| !*done)
            .unwrap_or_else(|p| p.into_inner());
        *guard
    }
}

/// Returned by [`DoneSignal::set_on_drop`].
#[derive(Debug)]
pub struct DoneGuard<'a> {
    signal: &'a DoneSignal,
}

impl Drop for DoneGuard<'_> {
    fn drop(&mut self) {
        self.signal.set();
    }
}

/// Draw the discovery spinner until `done` is set, then a settled line.
pub fn run_spinner<W: Write>(
    out: &mut W,
    counters: &Counters,
    done: &DoneSignal,
    interval: Duration,
) -> io::Result<()> {
    let mut tick = 0usize;
    loop {
        let glyph = SPINNER_GLYPHS[tick % SPINNER_GLYPHS.len()];
        write!(out, "\rKesfediliyor... [{}] {} dosya bulundu.", glyph, counters.discovered())?;
        out.flush()?;
        tick += 1;
        if done.wait_timeout(interval) {
            break;
        }
    }
    writeln!(
        out,
        "\rKesfediliyor... [OK] {} dosya bulundu.{}",
        counters.discovered(),
        " ".repeat(10)
    )?;
    out.flush()
}

/// Renders the copy-phase progress line from counter snapshots.
#[derive(Debug, Clone)]
pub struct CopyProgress {
    total_files: u64,
    total_bytes: u64,
    eta_speed_floor: f64,
}

impl CopyProgress {
    pub fn new(total_files: u64, total_bytes: u64, eta_speed_floor: f64) -> Self {
        CopyProgress {
            total_files,
            total_bytes,
            eta_speed_floor,
        }
    }

    /// Progress line for one tick, or `None` when nothing meaningful can be shown yet.
    pub fn render(&self, snapshot: &Snapshot, elapsed: Duration) -> Option<String> {
        if snapshot.processed == 0 || self.total_bytes == 0 {
            return None;
        }

        let copied = snapshot.bytes_copied;
        let percent = copied as f64 / self.total_bytes as f64 * 100.0;
        let elapsed_secs = elapsed.as_secs_f64();
        let speed = if elapsed_secs > 0.0 {
            copied as f64 / BYTES_PER_MB / elapsed_secs
        } else {
            0.0
        };
        let remaining = self.total_bytes.saturating_sub(copied);
        let eta = if speed > self.eta_speed_floor {
            remaining as f64 / BYTES_PER_MB / speed
        } else {
            0.0
        };

        Some(format!(
            "Ilerleme: %{:.2} [{}/{} dosya] [{}/{}] Hiz: {:.2} MB/s ETA: {}",
            percent,
            snapshot.processed,
            self.total_files,
            format_bytes(copied),
            format_bytes(self.total_bytes),
            speed,
            format_eta(eta),
        ))
    }

    /// Line printed once every worker has finished.
    pub fn render_final(&self) -> String {
        format!(
            "Ilerleme: %100.00 [{}/{} dosya] [{}/{}] Tamamlandi.",
            self.total_files,
            self.total_files,
            format_bytes(self.total_bytes),
            format_bytes(self.total_bytes),
        )
    }
}

/// Redraw the copy progress line every `interval` until `done` is set.
pub fn run_copy_reporter<W: Write>(
    out: &mut W,
    progress: &CopyProgress,
    counters: &Counters,
    done: &DoneSignal,
    interval: Duration,
) -> io::Result<()> {
    let started = Instant::now();
    while !done.wait_timeout(interval) {
        if let Some(line) = progress.render(&counters.snapshot(), started.elapsed()) {
            write!(out, "\r{}{}", line, " ".repeat(10))?;
            out.flush()?;
        }
    }
    writeln!(out, "\r{}{}", progress.render_final(), " ".repeat(20))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_record_updates_matching_counters() {
        let counters = Counters::new();
        counters.record(FileOutcome::Copied, 10);
        counters.record(FileOutcome::Skipped, 20);
        counters.record(FileOutcome::Failed, 30);

        let snap = counters.snapshot();
        assert_eq!(snap.processed, 3);
        assert_eq!(snap.copied, 1);
        assert_eq!(snap.skipped, 1);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.bytes_copied, 10);
    }

    #[test]
    fn test_done_signal_wait_returns_early() {
        let signal = DoneSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(5)));

        let started = Instant::now();
        thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(Duration::from_millis(20));
                signal.set();
            });
            assert!(signal.wait_timeout(Duration::from_secs(30)));
        });
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(signal.wait_timeout(Duration::ZERO));
    }

    #[test]
    fn test_done_guard_sets_on_drop() {
        let signal = DoneSignal::new();
        {
            let _guard = signal.set_on_drop();
            assert!(!signal.wait_timeout(Duration::ZERO));
        }
        assert!(signal.wait_timeout(Duration::ZERO));
    }

    #[test]
    fn test_render_skips_until_first_job() {
        let progress = CopyProgress::new(3, 60, 0.01);
        assert!(progress.render(&Snapshot::default(), Duration::from_secs(1)).is_none());

        let empty = CopyProgress::new(0, 0, 0.01);
        let snap = Snapshot {
            processed: 1,
            ..Snapshot::default()
        };
        assert!(empty.render(&snap, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_render_reports_percent_speed_and_eta() {
        let mb = 1024 * 1024;
        let progress = CopyProgress::new(4, 4 * mb, 0.01);
        let snap = Snapshot {
            processed: 2,
            copied: 2,
            bytes_copied: 2 * mb,
            ..Snapshot::default()
        };

        let line = progress
            .render(&snap, Duration::from_secs(2))
            .expect("line expected");
        assert_eq!(
            line,
            "Ilerleme: %50.00 [2/4 dosya] [2.0 MB/4.0 MB] Hiz: 1.00 MB/s ETA: 0dk 2sn"
        );
    }

    #[test]
    fn test_render_without_throughput_has_zero_eta() {
        let progress = CopyProgress::new(2, 1024 * 1024, 0.01);
        // Only skips so far: nothing copied, speed is zero.
        let snap = Snapshot {
            processed: 1,
            skipped: 1,
            ..Snapshot::default()
        };
        let line = progress
            .render(&snap, Duration::from_secs(5))
            .expect("line expected");
        assert!(line.starts_with("Ilerleme: %0.00 [1/2 dosya]"));
        assert!(line.ends_with("Hiz: 0.00 MB/s ETA: 0dk 0sn"));
    }

    #[test]
    fn test_copy_reporter_prints_final_line_after_signal() {
        let counters = Counters::new();
        let done = DoneSignal::new();
        let progress = CopyProgress::new(3, 60, 0.01);
        let mut out = Vec::new();

        thread::scope(|s| {
            let reporter = s.spawn(|| {
                run_copy_reporter(&mut out, &progress, &counters, &done, Duration::from_millis(5))
            });
            for _ in 0..3 {
                counters.record(FileOutcome::Copied, 20);
                thread::sleep(Duration::from_millis(10));
            }
            done.set();
            reporter.join().unwrap().expect("reporter failed");
        });

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let last = text.trim_end().rsplit('\r').next().unwrap();
        assert!(last.starts_with("Ilerleme: %100.00 [3/3 dosya] [60 B/60 B] Tamamlandi."));
    }

    #[test]
    fn test_spinner_rotates_and_settles() {
        let counters = Counters::new();
        let done = DoneSignal::new();
        let mut out = Vec::new();

        thread::scope(|s| {
            let spinner =
                s.spawn(|| run_spinner(&mut out, &counters, &done, Duration::from_millis(2)));
            for _ in 0..5 {
                counters.record_discovered();
                thread::sleep(Duration::from_millis(5));
            }
            done.set();
            spinner.join().unwrap().expect("spinner failed");
        });

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Kesfediliyor... [|]"));
        let last = text.trim_end().rsplit('\r').next().unwrap();
        assert!(last.starts_with("Kesfediliyor... [OK] 5 dosya bulundu."));
    }
}
