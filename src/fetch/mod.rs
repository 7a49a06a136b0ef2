//! Checksummed archive fetching.
//!
//! One blocking GET at a time, streamed to disk in fixed-size chunks with
//! a running SHA-1. A cached archive with a good digest costs no network
//! traffic at all; one with a bad digest is moved aside rather than
//! deleted so it can be inspected later.

pub mod checksum;

use crate::context::InstallContext;
use crate::error::{Result, StockpileError};
use crate::registry::PackageSpec;
use checksum::checksum_file;
use reqwest::blocking::Client;
use sha1::{Digest, Sha1};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest archive the fetcher will accept.
pub const MAX_PACKAGE_BYTES: u64 = 100 * 1024 * 1024;

/// Read granularity while streaming a download.
pub const CHUNK_BYTES: usize = 64 * 1024;

/// Suffix given to a cached archive whose digest does not match.
pub const WRONG_CHECKSUM_SUFFIX: &str = ".wrong-checksum";

/// Limits applied to every download.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Hard cap on archive size; a server declaring more is refused.
    pub max_bytes: u64,

    /// Stream read size.
    pub chunk_bytes: usize,

    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_PACKAGE_BYTES,
            chunk_bytes: CHUNK_BYTES,
            timeout: Duration::from_secs(300),
        }
    }
}

/// Progress callback: (bytes received so far, declared total).
pub type ProgressCallback = Box<dyn Fn(u64, u64)>;

/// Why a single download attempt did not produce a file.
enum DownloadError {
    /// This URL failed; the next candidate may still work.
    TryNext(String),

    /// Stop the whole fetch. The size sanity check tripping means the
    /// server is hostile or broken, not that a mirror might do better.
    Refused(String),

    /// Workspace damage (cannot write the file).
    Io(std::io::Error),
}

/// Downloads and verifies package archives.
pub struct Fetcher {
    client: Client,
    policy: FetchPolicy,
    progress: Option<ProgressCallback>,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_policy(FetchPolicy::default())
    }

    pub fn with_policy(policy: FetchPolicy) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("stockpile/", env!("CARGO_PKG_VERSION")))
                .timeout(policy.timeout)
                .build()
                .expect("Failed to build HTTP client"),
            policy,
            progress: None,
        }
    }

    /// Install a per-chunk progress callback.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Fetch a package's archive into the package dir and verify its SHA-1.
    ///
    /// Returns the path to the verified archive. Candidate URLs are tried
    /// in order; a URL whose download mismatches the digest is discarded
    /// and the next one tried. Exhausting the list is a
    /// [`StockpileError::Fetch`].
    pub fn fetch(&self, spec: &PackageSpec, ctx: &InstallContext) -> Result<PathBuf> {
        fs::create_dir_all(&ctx.package_dir)?;
        let local_path = ctx.package_dir.join(&spec.local_filename);

        // A cached archive with a good digest needs no network at all.
        if local_path.exists() {
            let actual = checksum_file(&local_path)?;
            if actual == spec.sha1 {
                tracing::info!("Good checksum for existing {} archive.", spec.name);
                return Ok(local_path);
            }
            let quarantined = ctx
                .package_dir
                .join(format!("{}{}", spec.local_filename, WRONG_CHECKSUM_SUFFIX));
            tracing::warn!(
                "Bad checksum for existing {} archive; moving it aside and re-downloading.",
                spec.name
            );
            fs::rename(&local_path, &quarantined)?;
        }

        for url in &spec.urls {
            tracing::info!("Fetching {} from {}", spec.name, url);
            match self.download_one(url, &local_path) {
                Ok(digest) => {
                    if digest == spec.sha1 {
                        tracing::info!("Good checksum.");
                        return Ok(local_path);
                    }
                    tracing::warn!(
                        "Bad checksum for {} fetched from {}: got {}, want {}.",
                        spec.name,
                        url,
                        digest,
                        spec.sha1
                    );
                    fs::remove_file(&local_path)?;
                }
                Err(DownloadError::TryNext(reason)) => {
                    tracing::warn!("Could not fetch {} from {}: {}", spec.name, url, reason);
                }
                Err(DownloadError::Refused(reason)) => {
                    return Err(StockpileError::Fetch {
                        package: spec.name.clone(),
                        reason,
                    });
                }
                Err(DownloadError::Io(err)) => return Err(err.into()),
            }
        }

        Err(StockpileError::Fetch {
            package: spec.name.clone(),
            reason: format!("all {} URLs failed", spec.urls.len()),
        })
    }

    /// Download one URL to `dest`, returning the streamed SHA-1 digest.
    ///
    /// Any partial file is removed before a `TryNext` return, so URL
    /// rotation never leaves debris behind.
    fn download_one(&self, url: &str, dest: &Path) -> std::result::Result<String, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| DownloadError::TryNext(err.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloadError::TryNext(format!("HTTP {}", response.status())));
        }

        // An absent Content-Length streams until EOF under the cap.
        let declared = response.content_length().unwrap_or(self.policy.max_bytes);
        if declared == 0 || declared > self.policy.max_bytes {
            return Err(DownloadError::Refused(format!(
                "{url} fails Content-Length sanity check ({declared} bytes)"
            )));
        }

        let mut file = File::create(dest).map_err(DownloadError::Io)?;
        let mut body = response;
        let mut hasher = Sha1::new();
        let mut buf = vec![0u8; self.policy.chunk_bytes];
        let mut received: u64 = 0;

        while received < declared {
            let want = usize::try_from(declared - received)
                .unwrap_or(buf.len())
                .min(buf.len());
            let n = match body.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) => {
                    drop(file);
                    let _ = fs::remove_file(dest);
                    return Err(DownloadError::TryNext(format!("read failed: {err}")));
                }
            };
            file.write_all(&buf[..n]).map_err(DownloadError::Io)?;
            hasher.update(&buf[..n]);
            received += n as u64;
            if let Some(progress) = &self.progress {
                progress(received, declared);
            }
        }

        Ok(hex::encode(hasher.finalize()))
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
