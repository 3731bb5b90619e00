//! Fixed-size pool of copy workers.
//!
//! Workers pull jobs from a [`JobSource`] until it reports no more input. Each
//! job is either skipped (its name is in the destination inventory), copied,
//! or fails; a failure is logged and the worker moves on. The pool returns
//! only after every worker has exited.

use std::collections::HashSet;
use std::ffi::OsString;
use std::thread;
use std::time::Instant;

use crate::fs_ops;
use crate::logger::Logger;
use crate::model::{CopyJob, FileOutcome};
use crate::progress::Counters;
use crate::queue::JobSource;

/// Read-only state every worker shares.
#[derive(Debug, Clone, Copy)]
pub struct WorkerContext<'a> {
    /// Names already present in the destination before copying started
    pub existing: &'a HashSet<OsString>,
    pub counters: &'a Counters,
    pub logger: &'a Logger,
}

/// Run `workers` threads against `source` and wait for all of them.
pub fn run_pool<S>(source: &S, workers: usize, ctx: WorkerContext<'_>)
where
    S: JobSource + ?Sized,
{
    thread::scope(|s| {
        for _ in 0..workers.max(1) {
            s.spawn(move || worker_loop(source, ctx));
        }
    });
}

fn worker_loop<S>(source: &S, ctx: WorkerContext<'_>)
where
    S: JobSource + ?Sized,
{
    while let Some(job) = source.next_job() {
        let outcome = process_job(&job, ctx);
        ctx.counters.record(outcome, job.file_size);
    }
}

/// Skip, copy, or fail a single job, logging the result.
pub fn process_job(job: &CopyJob, ctx: WorkerContext<'_>) -> FileOutcome {
    if ctx.existing.contains(job.destination_name()) {
        ctx.logger
            .log(format!("{} - STATUS: Zaten var, atlandi.", job.source_name()));
        return FileOutcome::Skipped;
    }

    let started = Instant::now();
    match fs_ops::copy_job_file(job) {
        Ok(_) => {
            ctx.logger.log(format!(
                "{} - STATUS: Kopyalandi ({} ms)",
                job.source_name(),
                started.elapsed().as_millis()
            ));
            FileOutcome::Copied
        }
        Err(e) => {
            ctx.logger.log(format!("HATA: {}", e));
            FileOutcome::Failed
        }
    }
}
