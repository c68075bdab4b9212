use crate::error::ConfigError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Command line, with every option also readable from the environment (or `.env`).
#[derive(Debug, Parser)]
#[command(name = "trafstat", version, about = "Traffic statistics for pcap capture files")]
pub struct Args {
    /// Capture files to analyse, in order
    #[arg(env = "TRAFSTAT_FILES", value_delimiter = ',')]
    pub files: Vec<PathBuf>,

    #[arg(short, long, value_enum, env = "TRAFSTAT_FORMAT", default_value = "summary")]
    pub format: OutputFormat,

    /// Files analysed in parallel (defaults to the number of CPUs)
    #[arg(short, long, env = "TRAFSTAT_WORKERS")]
    pub workers: Option<usize>,

    /// Write the plottable series of each capture as CSV into this directory
    #[arg(long, env = "TRAFSTAT_SERIES_DIR")]
    pub series_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub files: Vec<PathBuf>,
    pub format: OutputFormat,
    pub workers: usize,
    pub series_dir: Option<PathBuf>,
    pub verbose: u8,
}

impl Config {
    /// Loads `.env` if present, then parses the process arguments.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Config::try_from(Args::parse())
    }
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.files.is_empty() {
            return Err(ConfigError::NoFiles);
        }
        let workers = match args.workers {
            Some(0) => return Err(ConfigError::ZeroWorkers),
            Some(n) => n,
            None => thread::available_parallelism().map_or(1, |n| n.get()),
        };

        Ok(Config {
            workers: workers.min(args.files.len()),
            files: args.files,
            format: args.format,
            series_dir: args.series_dir,
            verbose: args.verbose,
        })
    }
}
