//! Version probing and comparison.
//!
//! Decides the only question the driver asks per package: is the installed
//! module already at an acceptable version? Every anomaly fails open (the
//! package gets reinstalled), because an unreadable version must never
//! mask a missing package.

use crate::context::InstallContext;
use crate::registry::{PackageSpec, VersionProbe};
use crate::shell::{self, ExecOptions};
use regex::Regex;
use std::cmp::Ordering;

/// The Python expression whose stdout reveals the installed version.
pub fn probe_expression(spec: &PackageSpec) -> String {
    let module = spec.module_name();
    match spec.probe {
        VersionProbe::Attribute => {
            format!("import {module}; print({module}.__version__)")
        }
        VersionProbe::GetVersion => {
            format!("import {module}; print({module}.get_version())")
        }
    }
}

/// The default probe: evaluate an expression with `python -c` under the
/// context's PYTHONPATH and return its stdout.
pub fn interpreter_probe(ctx: &InstallContext) -> Box<dyn Fn(&str) -> Option<String>> {
    let python = ctx.python.clone();
    let env = ctx.child_env();
    Box::new(move |expr: &str| {
        let options = ExecOptions::default().with_env(env.clone());
        shell::capture(&python, &["-c", expr], &options)
    })
}

/// Decide whether a package needs to be built and installed.
///
/// `probe` evaluates a Python expression in the target interpreter and
/// returns its stdout, or `None` when the interpreter exits nonzero.
pub fn needs_install(spec: &PackageSpec, probe: &dyn Fn(&str) -> Option<String>) -> bool {
    let Some(min_version) = &spec.min_version else {
        tracing::warn!(
            "{} carries no version floor; always reinstalled.",
            spec.name
        );
        return true;
    };

    let output = match probe(&probe_expression(spec)) {
        Some(output) => output,
        None => {
            tracing::info!("Could not import {}.", spec.module_name());
            return true;
        }
    };

    let Some(installed) = extract_version(&output) else {
        tracing::warn!(
            "No version found in {:?} from {}; reinstalling.",
            output,
            spec.module_name()
        );
        return true;
    };

    tracing::debug!(
        "{}: installed version {}, required {}",
        spec.name,
        installed,
        min_version
    );
    compare_versions(&installed, min_version) == Ordering::Less
}

/// Extract a version token from probe output.
///
/// Takes the first run starting with a digit, so `"1.0.2 final"` and a
/// line like `"Python 2.7.5"` both yield their dotted version.
pub fn extract_version(output: &str) -> Option<String> {
    let re = Regex::new(r"([0-9][0-9A-Za-z.]*)").ok()?;
    let captures = re.captures(output)?;
    let token = captures.get(1)?.as_str().trim_end_matches('.');
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Compare two dotted version strings.
///
/// Segments are split on `.` and compared pairwise: numerically when both
/// sides parse as integers, as plain strings otherwise. A missing segment
/// sorts first, so `1.2 < 1.2.1`. This keeps `0.10 > 0.6` (where a raw
/// string compare fails) while still ordering suffixed segments like
/// `6c8 < 6c9`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    for i in 0..a_parts.len().max(b_parts.len()) {
        let x = a_parts.get(i).copied().unwrap_or("");
        let y = b_parts.get(i).copied().unwrap_or("");
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(xn), Ok(yn)) => xn.cmp(&yn),
            _ => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}
