// Worker-per-file batch runner.
use crate::error::AnalysisError;
use crate::models::domain::CaptureReport;
use crossbeam_channel::unbounded;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<CaptureReport, AnalysisError>,
}

/// Analyses every capture in `paths`, one file per job.
///
/// A failing file never stops the others. `running` is only consulted between
/// files; once it drops to false the remaining files come back as cancelled.
/// Outcomes are returned in the order of `paths`.
pub fn analyze_all(paths: &[PathBuf], workers: usize, running: &AtomicBool) -> Vec<FileOutcome> {
    analyze_with(paths, workers, running, |path: &Path| crate::analyze_file(path))
}

pub fn analyze_with<F>(
    paths: &[PathBuf],
    workers: usize,
    running: &AtomicBool,
    analyze: F,
) -> Vec<FileOutcome>
where
    F: Fn(&Path) -> Result<CaptureReport, AnalysisError> + Sync,
{
    let (job_tx, job_rx) = unbounded::<(usize, PathBuf)>();
    let (outcome_tx, outcome_rx) = unbounded::<(usize, FileOutcome)>();

    for job in paths.iter().cloned().enumerate() {
        if job_tx.send(job).is_err() {
            break;
        }
    }
    drop(job_tx);

    let workers = workers.clamp(1, paths.len().max(1));
    debug!(files = paths.len(), workers, "starting batch");

    thread::scope(|scope| {
        for worker in 0..workers {
            let job_rx = job_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let analyze = &analyze;
            scope.spawn(move || {
                for (index, path) in job_rx.iter() {
                    let result = if running.load(Ordering::SeqCst) {
                        debug!(worker, path = %path.display(), "analysing");
                        analyze(&path)
                    } else {
                        Err(AnalysisError::Cancelled(path.clone()))
                    };

                    if let Err(e) = &result {
                        warn!(path = %path.display(), "skipping capture: {}", e);
                    }
                    if outcome_tx.send((index, FileOutcome { path, result })).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(outcome_tx);

    let mut outcomes: Vec<(usize, FileOutcome)> = outcome_rx.iter().collect();
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
