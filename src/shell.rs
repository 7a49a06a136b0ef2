//! Child process execution for build tools and interpreters.
//!
//! Everything here is blocking: spawn, wait, report. Build output belongs
//! on the user's terminal, so [`run`] passes stdio straight through;
//! [`capture`] is for short probes whose stdout we consume.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Options for spawning a build tool.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Extra environment variables (merged with the inherited env).
    pub env: Vec<(String, String)>,
}

impl ExecOptions {
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }
}

/// Render a command line for logging.
pub fn render(program: &str, args: &[&str]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Run a command to completion with inherited stdio.
///
/// Returns whether the command exited zero. Spawn failures (program not
/// on PATH, permission denied) are logged and count as failure; stdin is
/// inherited so tools like sudo can still prompt.
pub fn run(program: &str, args: &[&str], options: &ExecOptions) -> bool {
    tracing::info!("Running: {}", render(program, args));

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    match cmd.status() {
        Ok(status) => {
            if !status.success() {
                tracing::warn!(
                    "Command exited with {:?}: {}",
                    status.code(),
                    render(program, args)
                );
            }
            status.success()
        }
        Err(err) => {
            tracing::error!("Failed to spawn '{}': {}", program, err);
            false
        }
    }
}

/// Run a command and capture its trimmed stdout.
///
/// Returns `None` when the command cannot be spawned or exits nonzero.
/// Stderr is swallowed into the debug log; probe failures (a module that
/// is not installed yet) are expected and must not spray tracebacks.
pub fn capture(program: &str, args: &[&str], options: &ExecOptions) -> Option<String> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    let output = match cmd.output() {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!("Failed to spawn '{}': {}", program, err);
            return None;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(
            "Probe exited with {:?}: {} ({})",
            output.status.code(),
            render(program, args),
            stderr.trim()
        );
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_reports_exit_status() {
        assert!(run("true", &[], &ExecOptions::default()));
        assert!(!run("false", &[], &ExecOptions::default()));
    }

    #[test]
    fn run_handles_missing_program() {
        assert!(!run(
            "definitely-not-a-real-program",
            &[],
            &ExecOptions::default()
        ));
    }

    #[test]
    fn run_respects_env() {
        let options = ExecOptions::default()
            .with_env(vec![("STOCKPILE_TEST_VAR".to_string(), "42".to_string())]);
        assert!(run(
            "sh",
            &["-c", "test \"$STOCKPILE_TEST_VAR\" = 42"],
            &options
        ));
    }

    #[test]
    fn capture_returns_trimmed_stdout() {
        let out = capture("sh", &["-c", "echo '  hello  '"], &ExecOptions::default());
        assert_eq!(out.as_deref(), Some("hello"));
    }

    #[test]
    fn capture_returns_none_on_failure() {
        assert_eq!(capture("false", &[], &ExecOptions::default()), None);
        assert_eq!(
            capture("definitely-not-a-real-program", &[], &ExecOptions::default()),
            None
        );
    }

    #[test]
    fn capture_respects_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = capture("pwd", &[], &ExecOptions::in_dir(temp.path())).unwrap();
        let reported = std::fs::canonicalize(&out).unwrap();
        let expected = std::fs::canonicalize(temp.path()).unwrap();
        assert_eq!(reported, expected);
    }

    #[test]
    fn render_joins_program_and_args() {
        assert_eq!(
            render("python3", &["setup.py", "bdist_egg"]),
            "python3 setup.py bdist_egg"
        );
    }
}
