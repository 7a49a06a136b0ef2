//! The built-in package set.
//!
//! One constructor per package so tests can pick individual entries;
//! [`builtin_packages`] assembles them in install order.

use super::{BuildKind, PackageSpec, VersionProbe};

/// All built-in packages, in install order.
pub fn builtin_packages() -> Vec<PackageSpec> {
    vec![setuptools(), mysqldb(), django(), numpy(), matplotlib()]
}

/// Setuptools bootstraps the host interpreter itself: every later egg
/// build needs it, so it stays first in the registry.
pub fn setuptools() -> PackageSpec {
    PackageSpec {
        name: "Setuptools".to_string(),
        urls: vec![
            "http://pypi.python.org/packages/source/s/setuptools/setuptools-0.6c9.tar.gz"
                .to_string(),
        ],
        local_filename: "setuptools-0.6c9.tar.gz".to_string(),
        sha1: "79086433b341f0c1df45e10d586a7d3cc25089f1".to_string(),
        module: None,
        min_version: Some("0.6c9".to_string()),
        probe: VersionProbe::Attribute,
        build: BuildKind::HostBootstrap,
    }
}

pub fn mysqldb() -> PackageSpec {
    PackageSpec {
        name: "MySQLdb".to_string(),
        urls: vec![
            "http://dl.sourceforge.net/sourceforge/mysql-python/MySQL-python-1.2.2.tar.gz"
                .to_string(),
        ],
        local_filename: "MySQL-python-1.2.2.tar.gz".to_string(),
        sha1: "945a04773f30091ad81743f9eb0329a3ee3de383".to_string(),
        // The import name keeps its camel case.
        module: Some("MySQLdb".to_string()),
        min_version: Some("1.2.2".to_string()),
        probe: VersionProbe::Attribute,
        build: BuildKind::Egg {
            script: "setup.py".to_string(),
        },
    }
}

pub fn django() -> PackageSpec {
    PackageSpec {
        name: "Django".to_string(),
        urls: vec![
            "http://media.djangoproject.com/releases/1.0.2/Django-1.0.2-final.tar.gz".to_string(),
        ],
        local_filename: "Django-1.0.2-final.tar.gz".to_string(),
        sha1: "f2d9088f17aff47ea17e5767740cab67b2a73b6b".to_string(),
        module: None,
        min_version: Some("1.0.2".to_string()),
        // django has no __version__; it reports via get_version().
        probe: VersionProbe::GetVersion,
        build: BuildKind::Staged,
    }
}

pub fn numpy() -> PackageSpec {
    PackageSpec {
        name: "Numpy".to_string(),
        urls: vec![
            "http://dl.sourceforge.net/sourceforge/numpy/numpy-1.2.1.tar.gz".to_string(),
        ],
        local_filename: "numpy-1.2.1.tar.gz".to_string(),
        sha1: "1aa706e733aea18eaffa70d93c0105718acb66c5".to_string(),
        module: None,
        min_version: Some("1.2.1".to_string()),
        probe: VersionProbe::Attribute,
        build: BuildKind::Egg {
            script: "setupegg.py".to_string(),
        },
    }
}

/// Must stay after [`numpy`]: the matplotlib build imports numpy.
pub fn matplotlib() -> PackageSpec {
    PackageSpec {
        name: "Matplotlib".to_string(),
        urls: vec![
            "http://dl.sourceforge.net/sourceforge/matplotlib/matplotlib-0.98.5.2.tar.gz"
                .to_string(),
        ],
        local_filename: "matplotlib-0.98.5.2.tar.gz".to_string(),
        sha1: "fbce043555de4f5a34e2a47e200527720a90b370".to_string(),
        module: None,
        min_version: Some("0.98.5.2".to_string()),
        probe: VersionProbe::Attribute,
        build: BuildKind::Egg {
            script: "setupegg.py".to_string(),
        },
    }
}
