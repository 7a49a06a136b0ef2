//! Run reports.
//!
//! One [`InstallOutcome`] per package the driver touched, aggregated into
//! a [`RunReport`] that renders the human summary and the `--json` output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal state of one package in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageState {
    /// The installed version already satisfies the floor.
    Skipped,

    /// Fetched (or cached), built, and installed.
    Installed,

    /// Every candidate URL failed, or the download was refused.
    FetchFailed,

    /// The archive arrived but would not build or install.
    BuildFailed,
}

/// What happened to one package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallOutcome {
    pub package: String,
    pub state: PackageState,

    /// Failure detail, when there is any.
    pub message: Option<String>,
}

impl InstallOutcome {
    pub fn skipped(package: &str) -> Self {
        Self {
            package: package.to_string(),
            state: PackageState::Skipped,
            message: None,
        }
    }

    pub fn installed(package: &str) -> Self {
        Self {
            package: package.to_string(),
            state: PackageState::Installed,
            message: None,
        }
    }

    pub fn fetch_failed(package: &str, message: String) -> Self {
        Self {
            package: package.to_string(),
            state: PackageState::FetchFailed,
            message: Some(message),
        }
    }

    pub fn build_failed(package: &str) -> Self {
        Self {
            package: package.to_string(),
            state: PackageState::BuildFailed,
            message: None,
        }
    }
}

/// Everything that happened in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<InstallOutcome>,
}

impl RunReport {
    pub fn begin() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: InstallOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Packages that failed to fetch or build. Drives the exit code.
    pub fn error_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o.state,
                    PackageState::FetchFailed | PackageState::BuildFailed
                )
            })
            .count()
    }

    /// The failure lines printed to stderr at the end of a run.
    pub fn failure_lines(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| match o.state {
                PackageState::FetchFailed => {
                    Some(format!("!!! Unable to download {}", o.package))
                }
                PackageState::BuildFailed => {
                    Some(format!("!!! Unable to build and install {}", o.package))
                }
                _ => None,
            })
            .collect()
    }
}
