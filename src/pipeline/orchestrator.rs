//! Run orchestration
//!
//! Opens the run log, discovers WAV files, optionally previews their tags,
//! then hands one task per file to the bounded pool and folds the outcomes
//! into a [`RunSummary`].

use super::cancel::CancelFlag;
use super::pool::WorkerPool;
use super::worker;
use crate::config::Settings;
use crate::discovery;
use crate::error::{ConvertError, Result};
use crate::logging::RunLog;
use crate::tags;
use crate::types::{ConversionOutcome, ConversionTask, RunSummary, TaskReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Run a full conversion with no external cancellation
pub fn run(settings: &Settings) -> Result<RunSummary> {
    run_with_cancel(settings, &CancelFlag::new())
}

/// Run a full conversion; raising `cancel` stops tasks that have not finished.
///
/// Only a missing source root or a setup failure (destination, log, pool)
/// returns `Err`. Per-file failures are counted in the summary.
pub fn run_with_cancel(settings: &Settings, cancel: &CancelFlag) -> Result<RunSummary> {
    if !settings.source.is_dir() {
        return Err(ConvertError::SourceNotFound(settings.source.clone()));
    }

    std::fs::create_dir_all(&settings.destination)
        .map_err(|e| ConvertError::output_error(&settings.destination, e))?;

    let log = RunLog::open(&settings.destination, settings.console_level)?;
    let summary = log.in_scope(|| run_logged(settings, cancel));
    log.close()?;
    summary
}

fn run_logged(settings: &Settings, cancel: &CancelFlag) -> Result<RunSummary> {
    let run_start = Instant::now();

    info!("Source: {}", settings.source.display());
    info!("Destination: {}", settings.destination.display());
    info!("Bitrate: {}", settings.bitrate);
    info!("Workers: {}", settings.workers);
    info!("Dry run: {}", settings.dry_run);

    // Phase 1: Discovery
    let discovery_start = Instant::now();
    let files = discovery::scan(&settings.source)?;

    if files.is_empty() {
        warn!("No WAV files found in {}", settings.source.display());
        return Ok(RunSummary::new(0, settings.dry_run));
    }

    info!(
        "Found {} WAV files in {:.2}s",
        files.len(),
        discovery_start.elapsed().as_secs_f64()
    );

    if settings.preview > 0 {
        print!("{}", tags::render_preview(&files, settings.preview));
    }

    // Phase 2: Tasks
    let mut summary = RunSummary::new(files.len(), settings.dry_run);
    let tasks = build_tasks(files, settings, &mut summary);

    // Phase 3: Conversion
    let pool = WorkerPool::new(settings.workers)?;
    let progress = progress_bar(tasks.len(), settings.show_progress);
    let convert_start = Instant::now();

    pool.run(
        tasks,
        |task: ConversionTask| {
            let outcome = worker::convert(&task, cancel);
            TaskReport { task, outcome }
        },
        |report| {
            summary.record(&report.outcome);
            if let Some(pb) = &progress {
                let name = report
                    .task
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                pb.set_message(format!("{} {}", report.outcome.label(), name));
                pb.inc(1);
            }
        },
    );

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        "Conversion phase completed in {:.2}s",
        convert_start.elapsed().as_secs_f64()
    );

    if cancel.is_cancelled() {
        warn!("Run interrupted: {} tasks cancelled", summary.cancelled);
    }

    info!(
        "Summary: total={} converted={} skipped={} would_convert={} failed={} cancelled={}",
        summary.total_files,
        summary.converted,
        summary.skipped,
        summary.would_convert,
        summary.failed,
        summary.cancelled
    );
    info!(
        "Total run time: {:.2}s",
        run_start.elapsed().as_secs_f64()
    );

    debug_assert_eq!(summary.accounted(), summary.total_files);
    Ok(summary)
}

/// One task per file. Files that cannot be mapped into the destination tree
/// are recorded as failed here and never reach the pool.
fn build_tasks(
    files: Vec<PathBuf>,
    settings: &Settings,
    summary: &mut RunSummary,
) -> Vec<ConversionTask> {
    let mut tasks = Vec::with_capacity(files.len());

    for source in files {
        match discovery::resolve(&source, &settings.source, &settings.destination) {
            Ok(destination) => tasks.push(ConversionTask {
                source,
                destination,
                bitrate: settings.bitrate,
                dry_run: settings.dry_run,
            }),
            Err(e) => {
                error!("Failed {}: {}", source.display(), e);
                summary.record(&ConversionOutcome::Failed {
                    error: e.to_string(),
                });
            }
        }
    }

    tasks
}

fn progress_bar(len: usize, show: bool) -> Option<ProgressBar> {
    if !show || len == 0 {
        return None;
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    Some(pb)
}
