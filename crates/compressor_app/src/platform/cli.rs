use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use compressor_core::Target;
use engine_logging::LogDestination;

/// Compress a PDF down to a target size using the compression service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// PDF file to compress (100 MB max)
    pub file: PathBuf,

    /// Target size in MB
    #[arg(long, value_enum)]
    pub target: Option<TargetArg>,

    /// Compression service root, e.g. http://localhost:5000
    #[arg(long)]
    pub server: Option<String>,

    /// RON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save the compressed file when the job succeeds
    #[arg(long)]
    pub download: bool,

    /// Where downloaded files go
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    pub log: LogArg,

    /// Log at debug level
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    #[value(name = "5")]
    Five,
    #[value(name = "10")]
    Ten,
}

impl From<TargetArg> for Target {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Five => Target::FiveMb,
            TargetArg::Ten => Target::TenMb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(value: LogArg) -> Self {
        match value {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}
