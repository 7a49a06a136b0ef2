//! Staged build and prefix install.
//!
//! For packages that do not produce eggs (Django): build, install under a
//! throwaway prefix, then sync the staged site-packages subtree into the
//! install tree. The `lib/pythonX.Y/site-packages` shape is whatever
//! `setup.py install --prefix` decided to create, so locating it stays
//! best-effort with the prefix root as fallback.

use crate::context::InstallContext;
use crate::error::{Result, StockpileError};
use crate::registry::PackageSpec;
use crate::shell::{self, ExecOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn build_and_install(spec: &PackageSpec, workdir: &Path, ctx: &InstallContext) -> Result<bool> {
    if !workdir.join("setup.py").exists() {
        return Err(StockpileError::Precondition {
            package: spec.name.clone(),
            message: format!("setup.py does not exist in {}", workdir.display()),
        });
    }

    let options = ExecOptions::in_dir(workdir).with_env(ctx.child_env());
    if !shell::run(&ctx.python, &["setup.py", "build"], &options) {
        tracing::error!("{} build failed.", spec.name);
        return Ok(false);
    }

    // Dropped at the end of this function, taking the staged tree with it.
    let scratch = scratch_prefix()?;
    let prefix = format!("--prefix={}", scratch.path().display());
    if !shell::run(
        &ctx.python,
        &["setup.py", "install", "--no-compile", &prefix],
        &options,
    ) {
        tracing::error!("{} install failed.", spec.name);
        return Ok(false);
    }

    let Some(python_xy) = interpreter_tag(ctx) else {
        tracing::error!("Could not determine the {} lib directory tag.", ctx.python);
        return Ok(false);
    };

    let staged = locate_site_packages(scratch.path(), &python_xy);
    fs::create_dir_all(&ctx.install_dir)?;
    let source = format!("{}/", staged.display());
    let dest = format!("{}/", ctx.install_dir.display());
    if !shell::run("rsync", &["-r", &source, &dest], &ExecOptions::default()) {
        tracing::error!("{} rsync to the install dir failed.", spec.name);
        return Ok(false);
    }

    Ok(true)
}

/// Scratch prefix on host-local disk. Installs write hard links and
/// root-read files that misbehave on NFS mounts, so /var/tmp wins over
/// the default temp dir when it exists.
fn scratch_prefix() -> Result<TempDir> {
    if Path::new("/var/tmp").is_dir() {
        Ok(TempDir::new_in("/var/tmp")?)
    } else {
        Ok(TempDir::new()?)
    }
}

/// The interpreter's `pythonX.Y` directory tag.
fn interpreter_tag(ctx: &InstallContext) -> Option<String> {
    let tag = shell::capture(
        &ctx.python,
        &["-c", "import sys; print('python%d.%d' % sys.version_info[:2])"],
        &ExecOptions::default(),
    )?;
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Where `setup.py install --prefix` staged the modules: under
/// `lib/pythonX.Y/site-packages` when a `lib/` appeared, else flat in the
/// prefix itself (pure-script packages).
fn locate_site_packages(prefix: &Path, python_xy: &str) -> PathBuf {
    let lib = prefix.join("lib");
    if lib.is_dir() {
        lib.join(python_xy).join("site-packages")
    } else {
        prefix.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::archive::tests::have;
    use crate::registry::builtin;
    use tempfile::TempDir;

    #[test]
    fn missing_setup_py_is_a_precondition_error() {
        let temp = TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path(), "python3");
        let workdir = temp.path().join("Django-1.0.2-final");
        fs::create_dir_all(&workdir).unwrap();

        let spec = builtin::django();
        let err = build_and_install(&spec, &workdir, &ctx).unwrap_err();
        assert!(matches!(err, StockpileError::Precondition { .. }));
    }

    #[test]
    fn failing_build_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path(), "false");
        let workdir = temp.path().join("Django-1.0.2-final");
        fs::create_dir_all(&workdir).unwrap();
        fs::write(workdir.join("setup.py"), "").unwrap();

        let spec = builtin::django();
        assert!(!build_and_install(&spec, &workdir, &ctx).unwrap());
    }

    #[test]
    fn unreadable_interpreter_tag_is_a_build_failure() {
        let temp = TempDir::new().unwrap();
        // "true" exits 0 for build and install but prints nothing for the
        // tag probe.
        let ctx = InstallContext::new(temp.path(), "true");
        let workdir = temp.path().join("Django-1.0.2-final");
        fs::create_dir_all(&workdir).unwrap();
        fs::write(workdir.join("setup.py"), "").unwrap();

        let spec = builtin::django();
        assert!(!build_and_install(&spec, &workdir, &ctx).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn staged_install_syncs_into_install_dir() {
        if !have("rsync") {
            return;
        }
        let temp = TempDir::new().unwrap();

        // A stand-in interpreter: answers the tag probe, succeeds at
        // everything else without staging any files.
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
        let workdir = temp.path().join("Django-1.0.2-final");
        fs::create_dir_all(&workdir).unwrap();
        fs::write(workdir.join("setup.py"), "").unwrap();

        let spec = builtin::django();
        assert!(build_and_install(&spec, &workdir, &ctx).unwrap());
        // No lib/ appeared in the scratch prefix, so the empty prefix root
        // was synced and the install dir now exists.
        assert!(ctx.install_dir.is_dir());
    }

    #[test]
    fn locate_prefers_lib_subtree() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path();
        fs::create_dir_all(prefix.join("lib/python2.4/site-packages")).unwrap();

        let located = locate_site_packages(prefix, "python2.4");
        assert_eq!(located, prefix.join("lib/python2.4/site-packages"));
    }

    #[test]
    fn locate_falls_back_to_prefix_root() {
        let temp = TempDir::new().unwrap();
        let located = locate_site_packages(temp.path(), "python2.4");
        assert_eq!(located, temp.path());
    }

    #[test]
    fn scratch_prefix_is_created_and_cleaned() {
        let path = {
            let scratch = scratch_prefix().unwrap();
            assert!(scratch.path().is_dir());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
