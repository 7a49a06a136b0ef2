//! Egg build and install.
//!
//! The classic path: `<script> bdist_egg` lays a single `.egg` zip in
//! `dist/`, and installing it is an unzip into the private tree plus a
//! scrub of the zip's own metadata directory.

use crate::context::InstallContext;
use crate::error::{Result, StockpileError};
use crate::registry::PackageSpec;
use crate::shell::{self, ExecOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Build the egg, then unzip it into the install tree.
pub fn build_and_install(
    spec: &PackageSpec,
    script: &str,
    workdir: &Path,
    ctx: &InstallContext,
) -> Result<bool> {
    let Some(egg) = build_egg(spec, script, workdir, ctx)? else {
        return Ok(false);
    };
    install_egg(spec, &egg, ctx)
}

/// Run `<script> bdist_egg` in `workdir` and return the produced egg.
///
/// `Ok(None)` is a build failure. A registry entry naming a script the
/// verified archive does not contain is a precondition error.
pub fn build_egg(
    spec: &PackageSpec,
    script: &str,
    workdir: &Path,
    ctx: &InstallContext,
) -> Result<Option<PathBuf>> {
    if !workdir.join(script).exists() {
        return Err(StockpileError::Precondition {
            package: spec.name.clone(),
            message: format!("{} does not exist in {}", script, workdir.display()),
        });
    }

    // Eggs from an earlier failed run would confuse the dist/ scan.
    let dist = workdir.join("dist");
    if dist.is_dir() {
        fs::remove_dir_all(&dist)?;
    }

    let options = ExecOptions::in_dir(workdir).with_env(ctx.child_env());
    if !shell::run(&ctx.python, &[script, "bdist_egg"], &options) {
        tracing::error!("bdist_egg of {} failed.", spec.name);
        return Ok(None);
    }

    match find_egg(&dist) {
        Some(egg) => Ok(Some(egg)),
        None => {
            tracing::error!("bdist_egg of {} laid no egg in dist/.", spec.name);
            Ok(None)
        }
    }
}

/// The first `.egg` under `dist`. bdist_egg lays exactly one.
fn find_egg(dist: &Path) -> Option<PathBuf> {
    for entry in fs::read_dir(dist).ok()?.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "egg") {
            return Some(path);
        }
    }
    None
}

/// Unzip an egg into the install tree and scrub its EGG-INFO metadata.
pub fn install_egg(spec: &PackageSpec, egg: &Path, ctx: &InstallContext) -> Result<bool> {
    fs::create_dir_all(&ctx.install_dir)?;

    let install = ctx.install_dir.display().to_string();
    let rendered = egg.display().to_string();
    if !shell::run(
        "unzip",
        &["-q", "-o", "-d", &install, &rendered],
        &ExecOptions::default(),
    ) {
        tracing::error!("unzip of {} failed.", egg.display());
        return Ok(false);
    }

    let egg_info = ctx.install_dir.join("EGG-INFO");
    if egg_info.is_dir() {
        fs::remove_dir_all(&egg_info)?;
    }

    tracing::info!("Installed {} from its egg.", spec.name);
    Ok(true)
}
