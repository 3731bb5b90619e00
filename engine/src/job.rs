//! Run orchestration.
//!
//! A run goes through fixed phases, each fully finished before the next:
//! 1. Validate the source and prepare the destination (fatal on failure)
//! 2. Discovery: walk the source with a spinner on the side
//! 3. Inventory: list the destination into a skip-set
//! 4. Copy: drain the job queue with the worker pool while the progress
//!    line is redrawn, then signal completion and join the reporter

use std::io::{self, Write};
use std::thread;
use std::time::Instant;

use uuid::Uuid;

use crate::error::EngineError;
use crate::format::format_bytes;
use crate::fs_ops;
use crate::logger::Logger;
use crate::model::{CopyOptions, RunSummary};
use crate::pool::{self, WorkerContext};
use crate::progress::{self, CopyProgress, Counters, DoneSignal};
use crate::queue::JobQueue;

/// Run a copy, drawing progress lines on stdout.
///
/// # Errors
/// Returns EngineError only for the pre-flight checks (source missing or not
/// a directory, destination unusable). Everything after that is logged and
/// reflected in the returned counts.
pub fn run_copy(options: &CopyOptions, logger: &Logger) -> Result<RunSummary, EngineError> {
    run_copy_to(options, logger, &mut io::stdout())
}

/// Same as [`run_copy`], with progress lines written to `out`.
pub fn run_copy_to<W>(
    options: &CopyOptions,
    logger: &Logger,
    out: &mut W,
) -> Result<RunSummary, EngineError>
where
    W: Write + Send,
{
    let started = Instant::now();
    let mut summary = RunSummary::empty(Uuid::new_v4());
    logger.log(format!(
        "Oturum {} basladi: {} -> {}",
        summary.run_id,
        options.source.display(),
        options.destination.display()
    ));

    preflight(options, logger)?;

    // Phase 1: discovery
    logger.log("Faz 1: Dosyalar kesfediliyor...");
    let counters = Counters::new();
    let discovery_done = DoneSignal::new();
    let plan = thread::scope(|s| {
        let spinner = s.spawn(|| {
            progress::run_spinner(&mut *out, &counters, &discovery_done, options.spinner_interval)
        });
        let plan = {
            let _done = discovery_done.set_on_drop();
            fs_ops::discover(&options.source, &options.destination, &counters, logger)
        };
        check_reporter(spinner.join(), logger);
        plan
    });

    summary.discovered = plan.len() as u64;
    summary.total_bytes = plan.total_bytes;
    logger.log(format!(
        "Kesif tamamlandi. Toplam {} adet dosya bulundu ({}).",
        plan.len(),
        format_bytes(plan.total_bytes)
    ));
    if plan.is_empty() {
        logger.log("Kopyalanacak dosya bulunamadi.");
        summary.elapsed = started.elapsed();
        return Ok(summary);
    }

    // Phase 2: destination inventory
    logger.log("Faz 2: Hedef dizin analizi yapiliyor...");
    let existing = fs_ops::scan_destination(&options.destination, logger);
    summary.existing_at_destination = existing.len();
    logger.log(format!(
        "Hedef dizin analizi tamamlandi. {} adet mevcut dosya bulundu.",
        existing.len()
    ));

    // Phase 3: copy
    logger.log("Faz 3: Kopyalama islemi baslatiliyor...");
    let workers = options.worker_count();
    logger.log(format!("{} adet islemci is parcacigi kullanilacak.", workers));

    let queue = JobQueue::new();
    queue.push_all(plan.jobs.iter().cloned());
    queue.close();

    let reporter_view = CopyProgress::new(plan.len() as u64, plan.total_bytes, options.eta_speed_floor);
    let copy_finished = DoneSignal::new();
    let ctx = WorkerContext {
        existing: &existing,
        counters: &counters,
        logger,
    };
    thread::scope(|s| {
        let reporter = s.spawn(|| {
            progress::run_copy_reporter(
                &mut *out,
                &reporter_view,
                &counters,
                &copy_finished,
                options.progress_interval,
            )
        });
        {
            // Set only after every worker has joined.
            let _finished = copy_finished.set_on_drop();
            pool::run_pool(&queue, workers, ctx);
        }
        check_reporter(reporter.join(), logger);
    });

    let snapshot = counters.snapshot();
    summary.processed = snapshot.processed;
    summary.copied = snapshot.copied;
    summary.skipped = snapshot.skipped;
    summary.failed = snapshot.failed;
    summary.bytes_copied = snapshot.bytes_copied;
    summary.elapsed = started.elapsed();

    logger.log(format!(
        "Tum islemler tamamlandi. {} kopyalandi, {} atlandi, {} hatali, {} aktarildi. Sure: {:.2} sn",
        summary.copied,
        summary.skipped,
        summary.failed,
        format_bytes(summary.bytes_copied),
        summary.elapsed.as_secs_f64()
    ));
    Ok(summary)
}

fn preflight(options: &CopyOptions, logger: &Logger) -> Result<(), EngineError> {
    let result = fs_ops::validate_source(&options.source).and_then(|()| {
        let created = fs_ops::prepare_destination(&options.destination)?;
        if created {
            logger.log(format!(
                "INFO: Hedef dizin mevcut degil, olusturuldu: {}",
                options.destination.display()
            ));
        }
        Ok(())
    });
    if let Err(e) = &result {
        logger.log(format!("HATA: {}", e));
    }
    result
}

fn check_reporter(result: thread::Result<io::Result<()>>, logger: &Logger) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => logger.log(format!("UYARI: Ilerleme satiri yazilamadi: {}", e)),
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
