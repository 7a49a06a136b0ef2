//! Install-tree finalization.
//!
//! Runs once after the walk, even when packages failed. Problems here are
//! warnings, never package errors.

use crate::context::InstallContext;
use crate::shell::{self, ExecOptions};
use std::fs;
use std::path::Path;

/// Byte-compile the install tree and widen its permissions.
pub fn finalize(ctx: &InstallContext) {
    if !ctx.install_dir.is_dir() {
        tracing::debug!("No install dir to finalize.");
        return;
    }

    byte_compile(ctx);

    if let Err(err) = widen_permissions(&ctx.install_dir) {
        tracing::warn!("Permission fixup of the install dir failed: {}", err);
    }
}

/// Compile `.py` to `.pyc` in place. The compiled files embed the path
/// they were compiled at, so this has to happen in the final location,
/// never in a build prefix.
fn byte_compile(ctx: &InstallContext) {
    tracing::info!(
        "Compiling .py files in {} to .pyc.",
        ctx.install_dir.display()
    );
    let install = ctx.install_dir.display().to_string();
    let options = ExecOptions::default().with_env(ctx.child_env());
    if !shell::run(&ctx.python, &["-m", "compileall", "-q", &install], &options) {
        tracing::warn!("Byte compilation of the install dir exited nonzero.");
    }
}

/// The recursive equivalent of `chmod -R a+rX`: every entry becomes
/// world-readable; directories and files with any execute bit become
/// world-executable. Some setup scripts install world-unreadable files.
#[cfg(unix)]
fn widen_permissions(root: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = root.symlink_metadata()?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }

    let mut mode = metadata.permissions().mode() & 0o7777;
    mode |= 0o444;
    if metadata.is_dir() || mode & 0o111 != 0 {
        mode |= 0o111;
    }
    fs::set_permissions(root, fs::Permissions::from_mode(mode))?;

    if metadata.is_dir() {
        for entry in fs::read_dir(root)? {
            widen_permissions(&entry?.path())?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn widen_permissions(_root: &Path) -> std::io::Result<()> {
    Ok(())
}
