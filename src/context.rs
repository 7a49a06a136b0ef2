//! Working-directory context threaded through every pipeline stage.
//!
//! All ambient state (directories, target interpreter) lives here rather
//! than in globals, so the stages stay testable against temp dirs.

use std::env;
use std::path::PathBuf;

/// Subdirectory of the base dir where archives land and are unpacked.
pub const PACKAGE_DIR_NAME: &str = "ExternalSource";

/// Subdirectory of the base dir holding the private install tree.
pub const INSTALL_DIR_NAME: &str = "site-packages";

/// Directories and interpreter for one run.
#[derive(Debug, Clone)]
pub struct InstallContext {
    /// Working root; the other two directories live under it.
    pub base_dir: PathBuf,

    /// Where archives are downloaded and transient extract trees appear.
    pub package_dir: PathBuf,

    /// The private install tree packages are placed into.
    pub install_dir: PathBuf,

    /// Interpreter used for version probes and setup scripts.
    pub python: String,
}

impl InstallContext {
    pub fn new(base_dir: impl Into<PathBuf>, python: impl Into<String>) -> Self {
        let base_dir = base_dir.into();
        let package_dir = base_dir.join(PACKAGE_DIR_NAME);
        let install_dir = base_dir.join(INSTALL_DIR_NAME);
        Self {
            base_dir,
            package_dir,
            install_dir,
            python: python.into(),
        }
    }

    /// The value `PYTHONPATH` should carry so spawned interpreters see the
    /// private tree first: the install dir prepended to any inherited value.
    pub fn python_path_value(&self) -> String {
        self.python_path_with(env::var("PYTHONPATH").ok().as_deref())
    }

    fn python_path_with(&self, existing: Option<&str>) -> String {
        let install = self.install_dir.display().to_string();
        match existing {
            Some(rest) if !rest.is_empty() => format!("{install}:{rest}"),
            _ => install,
        }
    }

    /// Environment entries every spawned interpreter receives.
    pub fn child_env(&self) -> Vec<(String, String)> {
        vec![("PYTHONPATH".to_string(), self.python_path_value())]
    }

    /// Process-wide export of [`Self::python_path_value`]. Called once from
    /// `main` before the driver runs; library code passes the value per
    /// command through `ExecOptions` instead of mutating the environment.
    pub fn export_python_path(&self) {
        env::set_var("PYTHONPATH", self.python_path_value());
    }
}
