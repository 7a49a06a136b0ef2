//! Host bootstrap install.
//!
//! Setuptools installs itself into the HOST interpreter, not the private
//! tree: every later egg build imports it, so it has to exist system-wide
//! first. Eggs are self-executing shell archives, and handing one to
//! `sudo /bin/sh` is the sanctioned bootstrap route. Because this is the
//! single place the tool touches the host, the user gets a loud warning
//! and a window to bail out.

use crate::context::InstallContext;
use crate::error::Result;
use crate::registry::PackageSpec;
use crate::shell::{self, ExecOptions};
use console::style;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// How long the user gets to ^C before sudo runs.
pub const SUDO_GRACE: Duration = Duration::from_secs(15);

pub fn build_and_install(spec: &PackageSpec, workdir: &Path, ctx: &InstallContext) -> Result<bool> {
    tracing::info!(
        "{} installs into the host interpreter, not {}.",
        spec.name,
        ctx.install_dir.display()
    );

    let Some(egg) = super::egg::build_egg(spec, "setup.py", workdir, ctx)? else {
        return Ok(false);
    };

    announce_sudo(spec, &ctx.python);
    thread::sleep(SUDO_GRACE);

    install_on_host(spec, &egg)
}

fn announce_sudo(spec: &PackageSpec, python: &str) {
    let version = spec.min_version.as_deref().unwrap_or("");
    let banner = style("!".repeat(56)).red().bold();
    eprintln!("{banner}");
    eprintln!(
        "About to run sudo to install {} {} on this host",
        spec.name, version
    );
    eprintln!("for use by {python}.");
    eprintln!(
        "{}",
        style(format!(
            "^C within {} seconds to abort.",
            SUDO_GRACE.as_secs()
        ))
        .yellow()
        .bold()
    );
    eprintln!("{banner}");
}

/// Copy the egg onto host-local disk and run it via sudo. Root cannot
/// always read the build tree when it sits on an NFS mount.
fn install_on_host(spec: &PackageSpec, egg: &Path) -> Result<bool> {
    let scratch = if Path::new("/var/tmp").is_dir() {
        tempfile::TempDir::new_in("/var/tmp")?
    } else {
        tempfile::TempDir::new()?
    };

    let Some(file_name) = egg.file_name() else {
        return Err(anyhow::anyhow!("egg path {} has no file name", egg.display()).into());
    };
    let local_egg = scratch.path().join(file_name);
    fs::copy(egg, &local_egg)?;

    let rendered = local_egg.display().to_string();
    if !shell::run("sudo", &["/bin/sh", &rendered], &ExecOptions::default()) {
        tracing::error!("Host install of {} from its egg failed.", spec.name);
        return Ok(false);
    }
    Ok(true)
}
