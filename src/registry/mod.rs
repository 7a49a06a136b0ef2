//! Package registry: what to install, from where, and how.
//!
//! The registry is an ordered list of [`PackageSpec`]s. Order is meaningful
//! and is the only dependency mechanism: a package that must build after
//! another (matplotlib needs numpy at build time) simply appears later in
//! the list. There is no graph resolution.
//!
//! # Example
//!
//! ```
//! use stockpile::registry::Registry;
//!
//! let registry = Registry::new();
//! let names: Vec<&str> = registry.packages().iter().map(|p| p.name.as_str()).collect();
//! assert!(names.contains(&"Django"));
//! ```

pub mod builtin;

/// How the installed version is read from the imported module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionProbe {
    /// Read `module.__version__`.
    Attribute,

    /// Call `module.get_version()` and keep the first whitespace-separated
    /// token. Django reports "1.0.2 final".
    GetVersion,
}

/// Build/install strategy for a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildKind {
    /// Run `<script> bdist_egg` and unzip the produced egg into the
    /// install tree. `script` is `setup.py` or `setupegg.py`.
    Egg { script: String },

    /// `setup.py build`, then install under a scratch prefix and sync the
    /// staged site-packages subtree into the install tree. For packages
    /// that do not produce eggs.
    Staged,

    /// Build the egg, then hand it to the host system via sudo. The one
    /// strategy that installs outside the private tree.
    HostBootstrap,
}

impl BuildKind {
    /// Short label for listings and logs.
    pub fn label(&self) -> &'static str {
        match self {
            BuildKind::Egg { .. } => "egg",
            BuildKind::Staged => "staged",
            BuildKind::HostBootstrap => "host-bootstrap",
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    /// Display name, unique within the registry.
    pub name: String,

    /// Candidate download URLs, tried in order. Never empty.
    pub urls: Vec<String>,

    /// Archive basename on disk. Always ends in `.tar.gz`.
    pub local_filename: String,

    /// Lowercase hex SHA-1 digest of the genuine archive.
    pub sha1: String,

    /// Importable module name, when it differs from the lowercased display
    /// name (MySQLdb imports as `MySQLdb`, not `mysqldb`).
    pub module: Option<String>,

    /// Smallest acceptable installed version. `None` means the package is
    /// reinstalled on every run.
    pub min_version: Option<String>,

    /// How to read the installed version.
    pub probe: VersionProbe,

    /// How to build and install the archive.
    pub build: BuildKind,
}

impl PackageSpec {
    /// The module name used for version probes.
    pub fn module_name(&self) -> String {
        self.module
            .clone()
            .unwrap_or_else(|| self.name.to_lowercase())
    }

    /// Directory name the archive unpacks to: the filename minus `.tar.gz`.
    pub fn archive_stem(&self) -> &str {
        self.local_filename
            .strip_suffix(".tar.gz")
            .unwrap_or(&self.local_filename)
    }
}

/// Ordered collection of packages for one run.
pub struct Registry {
    packages: Vec<PackageSpec>,
}

impl Registry {
    /// The built-in package set, in install order.
    pub fn new() -> Self {
        Self {
            packages: builtin::builtin_packages(),
        }
    }

    /// A registry over an explicit package list.
    pub fn with_packages(packages: Vec<PackageSpec>) -> Self {
        Self { packages }
    }

    pub fn packages(&self) -> &[PackageSpec] {
        &self.packages
    }

    /// Packages matching the given names, case-insensitively, in registry
    /// order. An empty filter selects everything. Names matching nothing
    /// are warned about and otherwise ignored.
    pub fn select(&self, names: &[String]) -> Vec<&PackageSpec> {
        if names.is_empty() {
            return self.packages.iter().collect();
        }

        let wanted: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        for name in &wanted {
            if !self
                .packages
                .iter()
                .any(|p| p.name.to_lowercase() == *name)
            {
                tracing::warn!("No package named '{}' in the registry.", name);
            }
        }

        self.packages
            .iter()
            .filter(|p| wanted.contains(&p.name.to_lowercase()))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
