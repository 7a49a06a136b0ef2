//! The sequential fetch, build, and install walk.
//!
//! [`Driver::run`] takes each selected package through version check,
//! fetch, and build in registry order. Per-package failures are recorded
//! in the [`RunReport`] and the walk continues; descriptor contract
//! violations and filesystem faults abort the whole run.

use crate::context::InstallContext;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::install::{self, finalize};
use crate::registry::{PackageSpec, Registry};
use crate::report::{InstallOutcome, RunReport};
use crate::version;

/// Walks the registry and installs what the host is missing.
pub struct Driver {
    registry: Registry,
    ctx: InstallContext,
    fetcher: Fetcher,
    probe: Box<dyn Fn(&str) -> Option<String>>,
}

impl Driver {
    /// Create a driver that asks `ctx.python` for installed versions.
    pub fn new(registry: Registry, ctx: InstallContext, fetcher: Fetcher) -> Self {
        let probe = version::interpreter_probe(&ctx);
        Self {
            registry,
            ctx,
            fetcher,
            probe,
        }
    }

    /// Process every package named in `only`, or the whole registry when
    /// `only` is empty, then byte-compile and fix permissions under the
    /// install dir.
    pub fn run(&self, only: &[String]) -> Result<RunReport> {
        let mut report = RunReport::begin();

        for spec in self.registry.select(only) {
            self.process(spec, &mut report)?;
        }

        finalize::finalize(&self.ctx);
        report.finish();
        Ok(report)
    }

    fn process(&self, spec: &PackageSpec, report: &mut RunReport) -> Result<()> {
        if !version::needs_install(spec, &*self.probe) {
            tracing::info!("A new {} is not needed on this system.", spec.name);
            report.record(InstallOutcome::skipped(&spec.name));
            return Ok(());
        }

        let archive = match self.fetcher.fetch(spec, &self.ctx) {
            Ok(path) => path,
            Err(err) if err.is_package_scoped() => {
                tracing::error!("{err}");
                report.record(InstallOutcome::fetch_failed(&spec.name, err.to_string()));
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if install::build_and_install(spec, Some(&archive), &self.ctx)? {
            report.record(InstallOutcome::installed(&spec.name));
        } else {
            report.record(InstallOutcome::build_failed(&spec.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StockpileError;
    use crate::fetch::checksum;
    use crate::install::archive::tests::{have, make_archive, spec_for};
    use crate::registry::{BuildKind, PackageSpec, VersionProbe};
    use crate::report::PackageState;
    use httpmock::MockServer;
    use std::fs;
    use tempfile::TempDir;

    fn spec_with_url(name: &str, url: String) -> PackageSpec {
        PackageSpec {
            name: name.to_string(),
            urls: vec![url],
            local_filename: format!("{name}-1.0.tar.gz"),
            sha1: "0000000000000000000000000000000000000000".to_string(),
            module: None,
            min_version: Some("1.0".to_string()),
            probe: VersionProbe::Attribute,
            build: BuildKind::Staged,
        }
    }

    fn driver_for(packages: Vec<PackageSpec>, ctx: InstallContext) -> Driver {
        Driver::new(Registry::with_packages(packages), ctx, Fetcher::new())
    }

    #[test]
    fn satisfied_package_is_skipped_without_touching_the_network() {
        let temp = TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path(), "python3");
        let package_dir = ctx.package_dir.clone();

        let spec = spec_with_url("widget", "http://unused.invalid/widget-1.0.tar.gz".into());
        let mut driver = driver_for(vec![spec], ctx);
        driver.probe = Box::new(|_| Some("99.0".to_string()));

        let report = driver.run(&[]).unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].state, PackageState::Skipped);
        assert_eq!(report.error_count(), 0);
        // Nothing was fetched, so the package dir was never created.
        assert!(!package_dir.exists());
    }

    #[test]
    fn fetch_failure_does_not_stop_the_walk() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method("GET").path("/alpha-1.0.tar.gz");
            then.status(404);
        });
        let second = server.mock(|when, then| {
            when.method("GET").path("/omega-1.0.tar.gz");
            then.status(404);
        });

        let temp = TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path(), "python3");
        let mut driver = driver_for(
            vec![
                spec_with_url("alpha", server.url("/alpha-1.0.tar.gz")),
                spec_with_url("omega", server.url("/omega-1.0.tar.gz")),
            ],
            ctx,
        );
        driver.probe = Box::new(|_| None);

        let report = driver.run(&[]).unwrap();

        first.assert();
        second.assert();
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.outcomes[0].state, PackageState::FetchFailed);
        assert_eq!(report.outcomes[1].state, PackageState::FetchFailed);
        assert_eq!(
            report.failure_lines(),
            vec!["!!! Unable to download alpha", "!!! Unable to download omega"]
        );
    }

    #[test]
    fn build_failure_is_recorded_and_the_walk_continues() {
        if !have("tar") {
            return;
        }
        let temp = TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path(), "false");

        // Pre-seed the cache so no network is involved; the stand-in
        // interpreter then refuses to build it.
        let archive = make_archive(&ctx, "alpha-1.0", &[("setup.py", "")]);
        let mut failing = spec_for("alpha-1.0", BuildKind::Egg {
            script: "setup.py".to_string(),
        });
        failing.sha1 = checksum::checksum_file(&archive).unwrap();

        let satisfied = spec_with_url("zeta", "http://unused.invalid/zeta-1.0.tar.gz".into());

        let mut driver = driver_for(vec![failing, satisfied], ctx);
        driver.probe = Box::new(|expr| {
            if expr.contains("zeta") {
                Some("99.0".to_string())
            } else {
                None
            }
        });

        let report = driver.run(&[]).unwrap();

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.outcomes[0].state, PackageState::BuildFailed);
        assert_eq!(report.outcomes[1].state, PackageState::Skipped);
        assert_eq!(
            report.failure_lines(),
            vec!["!!! Unable to build and install alpha-1.0"]
        );
    }

    #[test]
    #[cfg(unix)]
    fn built_package_lands_in_the_report_as_installed() {
        if !have("tar") || !have("rsync") {
            return;
        }
        let temp = TempDir::new().unwrap();

        // Answers the tag probe and succeeds at everything else.
        let python = temp.path().join("fake-python");
        fs::write(
            &python,
            "#!/bin/sh\ncase \"$*\" in *version_info*) echo python2.4;; esac\nexit 0\n",
        )
        .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let ctx = InstallContext::new(temp.path(), python.display().to_string());
        let archive = make_archive(&ctx, "widget-1.0", &[("setup.py", "")]);
        let mut spec = spec_for("widget-1.0", BuildKind::Staged);
        spec.sha1 = checksum::checksum_file(&archive).unwrap();

        let mut driver = driver_for(vec![spec], ctx);
        driver.probe = Box::new(|_| None);

        let report = driver.run(&[]).unwrap();

        assert_eq!(report.error_count(), 0);
        assert_eq!(report.outcomes[0].state, PackageState::Installed);
    }

    #[test]
    fn missing_setup_script_aborts_the_run() {
        if !have("tar") {
            return;
        }
        let temp = TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path(), "python3");

        // The archive holds no setup.py at all, which is a descriptor
        // bug rather than a build failure.
        let archive = make_archive(&ctx, "broken-1.0", &[("README", "no setup here")]);
        let mut spec = spec_for("broken-1.0", BuildKind::Egg {
            script: "setup.py".to_string(),
        });
        spec.sha1 = checksum::checksum_file(&archive).unwrap();

        let mut driver = driver_for(vec![spec], ctx);
        driver.probe = Box::new(|_| None);

        let err = driver.run(&[]).unwrap_err();
        assert!(matches!(err, StockpileError::Precondition { .. }));
    }

    #[test]
    fn name_filter_limits_the_walk() {
        let temp = TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path(), "python3");

        let mut driver = driver_for(
            vec![
                spec_with_url("alpha", "http://unused.invalid/a.tar.gz".into()),
                spec_with_url("omega", "http://unused.invalid/o.tar.gz".into()),
            ],
            ctx,
        );
        driver.probe = Box::new(|_| Some("99.0".to_string()));

        let report = driver.run(&["OMEGA".to_string()]).unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].package, "omega");
    }
}
