//! Error types for stockpile operations.
//!
//! This module defines [`StockpileError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `StockpileError` for failures that need distinct handling by the
//!   driver (fetch exhaustion vs. broken preconditions)
//! - Use `anyhow::Error` (via `StockpileError::Other`) for unexpected errors
//! - Build failures are NOT errors: strategies return `Ok(false)` and the
//!   driver records them, so one bad package never aborts the walk

use thiserror::Error;

/// Core error type for stockpile operations.
#[derive(Debug, Error)]
pub enum StockpileError {
    /// Every candidate URL failed, or the download tripped a sanity check.
    /// Recorded per package; the driver keeps walking the registry.
    #[error("Failed to fetch '{package}': {reason}")]
    Fetch { package: String, reason: String },

    /// The registry data or call sequence is wrong (missing setup script in
    /// a verified archive, build requested without a fetch). Fatal: the run
    /// cannot be trusted past this point.
    #[error("Precondition failed for '{package}': {message}")]
    Precondition { package: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StockpileError {
    /// Whether the driver should record this error and continue the walk
    /// rather than abort the run.
    pub fn is_package_scoped(&self) -> bool {
        matches!(self, StockpileError::Fetch { .. })
    }
}

/// Result type alias for stockpile operations.
pub type Result<T> = std::result::Result<T, StockpileError>;
