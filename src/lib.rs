//! Stockpile - fetch, verify, build, and install pinned Python packages.
//!
//! Stockpile walks a fixed registry of package descriptors, asks the
//! target interpreter whether each one is already new enough, downloads
//! and checksums the missing ones, and builds each archive with its
//! declared strategy into a shared site-packages tree.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`context`] - Directory layout and interpreter handle for one run
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - Checksummed archive download with local caching
//! - [`install`] - Build strategies and post-install housekeeping
//! - [`pipeline`] - The sequential fetch, build, and install walk
//! - [`registry`] - The ordered set of package descriptors
//! - [`report`] - Per-package outcomes and run summaries
//! - [`shell`] - Shell command execution
//! - [`version`] - Installed-version probing and comparison
//!
//! # Example
//!
//! ```
//! use std::cmp::Ordering;
//! use stockpile::version::compare_versions;
//!
//! // Numeric segments compare numerically, so 0.10 is newer than 0.6.
//! assert_eq!(compare_versions("0.10", "0.6"), Ordering::Greater);
//! ```

pub mod cli;
pub mod context;
pub mod error;
pub mod fetch;
pub mod install;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod shell;
pub mod version;

pub use error::{Result, StockpileError};
