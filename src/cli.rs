//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Stockpile - fetch, build, and install pinned Python packages.
#[derive(Debug, Parser)]
#[command(name = "stockpile")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Only process these packages (case-insensitive registry names)
    pub packages: Vec<String>,

    /// Tree to install under; archives land in <base-dir>/ExternalSource,
    /// modules in <base-dir>/site-packages
    #[arg(long, env = "STOCKPILE_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Python interpreter used for version checks and builds
    #[arg(long, env = "STOCKPILE_PYTHON", default_value = "python3")]
    pub python: String,

    /// List the registry and exit without installing anything
    #[arg(long)]
    pub list: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress the download progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
