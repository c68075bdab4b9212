use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use trafstat::batch::{self, FileOutcome};
use trafstat::config::{Config, OutputFormat};
use trafstat::models::dto::FailureDTO;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_logging(config.verbose);

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    let outcomes = batch::analyze_all(&config.files, config.workers, &running);
    let failures = outcomes.iter().filter(|o| o.result.is_err()).count();

    match config.format {
        OutputFormat::Summary => print_summaries(&outcomes),
        OutputFormat::Json => print_json(&outcomes)?,
    }

    if let Some(dir) = &config.series_dir {
        for report in outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
            match report.write_series(dir) {
                Ok(written) => info!(source = %report.source_file, files = written.len(), "series written"),
                Err(e) => error!(source = %report.source_file, "cannot write series: {}", e),
            }
        }
    }

    if failures > 0 {
        warn!(failures, total = outcomes.len(), "some captures could not be analysed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summaries(outcomes: &[FileOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => println!("{}\n", report),
            Err(e) => eprintln!("Error analysing {}: {}", outcome.path.display(), e),
        }
    }
}

fn print_json(outcomes: &[FileOutcome]) -> Result<(), serde_json::Error> {
    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => reports.push(report.to_dto()),
            Err(e) => failures.push(FailureDTO {
                source_file: outcome.path.display().to_string(),
                error: e.to_string(),
            }),
        }
    }

    let document = serde_json::json!({ "reports": reports, "failures": failures });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
