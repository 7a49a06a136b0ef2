//! Build and install strategies.
//!
//! [`build_and_install`] is the single dispatch point: it unpacks the
//! verified archive and hands the extracted tree to one of the three
//! strategies. `Ok(true)` means installed, `Ok(false)` is a build failure
//! the driver records and moves past, and `Err` is reserved for broken
//! preconditions that invalidate the whole run.

pub mod archive;
pub mod bootstrap;
pub mod egg;
pub mod finalize;
pub mod staged;

use crate::context::InstallContext;
use crate::error::{Result, StockpileError};
use crate::registry::{BuildKind, PackageSpec};
use std::path::Path;

/// Build and install one package from its fetched archive.
pub fn build_and_install(
    spec: &PackageSpec,
    fetched: Option<&Path>,
    ctx: &InstallContext,
) -> Result<bool> {
    let Some(verified) = fetched else {
        return Err(StockpileError::Precondition {
            package: spec.name.clone(),
            message: "build requested without a fetched archive".to_string(),
        });
    };

    archive::with_extracted(verified, spec, ctx, |workdir| match &spec.build {
        BuildKind::Egg { script } => egg::build_and_install(spec, script, workdir, ctx),
        BuildKind::Staged => staged::build_and_install(spec, workdir, ctx),
        BuildKind::HostBootstrap => bootstrap::build_and_install(spec, workdir, ctx),
    })
}
