//! Tar extraction with guaranteed cleanup.

use crate::context::InstallContext;
use crate::error::Result;
use crate::registry::PackageSpec;
use crate::shell::{self, ExecOptions};
use std::fs;
use std::path::Path;

/// Extract the verified archive inside the package dir, run `f` against
/// the extracted directory, then remove that directory however `f` fared.
///
/// A failing tar, or a tarball that unpacks to something other than its
/// own stem, is a build failure (`Ok(false)`), not a crash.
pub fn with_extracted<F>(
    verified: &Path,
    spec: &PackageSpec,
    ctx: &InstallContext,
    f: F,
) -> Result<bool>
where
    F: FnOnce(&Path) -> Result<bool>,
{
    let rendered = verified.display().to_string();
    if !shell::run("tar", &["-xzf", &rendered], &ExecOptions::in_dir(&ctx.package_dir)) {
        tracing::error!("Extraction of {} failed.", spec.local_filename);
        return Ok(false);
    }

    let workdir = ctx.package_dir.join(spec.archive_stem());
    if !workdir.is_dir() {
        tracing::error!(
            "{} did not unpack to the expected {} directory.",
            spec.local_filename,
            spec.archive_stem()
        );
        return Ok(false);
    }

    let outcome = f(&workdir);

    if let Err(err) = fs::remove_dir_all(&workdir) {
        tracing::warn!("Could not remove {}: {}", workdir.display(), err);
    }
    outcome
}
