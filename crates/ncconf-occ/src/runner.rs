//! Process execution seam
//!
//! [`CommandRunner`] is what [`crate::OccStore`] calls to run occ. The
//! production [`ProcessRunner`] spawns the program directly with an argument
//! vector, so values never pass through a shell.

use std::path::Path;
use std::process::Command;

use crate::error::StoreError;

/// Runs a program and returns its standard output
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`
    ///
    /// # Errors
    /// Returns [`StoreError::Spawn`] if the process cannot start and
    /// [`StoreError::CommandFailed`] if it exits unsuccessfully
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<String, StoreError>;
}

/// Production runner backed by [`std::process::Command`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<String, StoreError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| StoreError::Spawn {
                command: command_line(program, args),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(StoreError::CommandFailed {
                command: command_line(program, args),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<String, StoreError> {
        (**self).run(program, args, cwd)
    }
}

/// Human-readable command line, for logs and errors
pub(crate) fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_arguments() {
        let args = vec!["occ".to_string(), "config:list".to_string()];
        assert_eq!(command_line("php", &args), "php occ config:list");
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = ProcessRunner
            .run("sh", &["-c".to_string(), "printf hello".to_string()], dir.path())
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcessRunner
            .run("sh", &["-c".to_string(), "echo broken >&2; exit 3".to_string()], dir.path())
            .unwrap_err();
        match err {
            StoreError::CommandFailed { status, stderr, .. } => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn process_runner_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcessRunner
            .run("ncconf-definitely-missing-binary", &[], dir.path())
            .unwrap_err();
        assert!(matches!(err, StoreError::Spawn { .. }));
    }
}
