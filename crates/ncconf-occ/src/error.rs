//! Error types for the occ store
//!
//! Provides error handling for:
//! - Locating and accessing the occ script
//! - Running occ and reading its output
//! - Loading declared configuration files
//! - Converging (listing, reconciling, applying)

use std::io;
use std::path::PathBuf;

use ncconf_core::{Operation, ReconcileError, ValueError};

/// Store access and command execution errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Install path is not a directory
    #[error("{} is not a valid directory", .0.display())]
    InvalidInstallDir(PathBuf),

    /// No occ script in the install directory
    #[error("command line tool not found in {}", .0.display())]
    ToolNotFound(PathBuf),

    /// occ exists but cannot be read by the current user
    #[error("unable to run command line interface at {}: check owner/permissions", .path.display())]
    NotAccessible {
        /// Path of the occ script
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Process could not be started
    #[error("failed to execute '{command}': {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Process ran and reported failure
    #[error("'{command}' failed ({}): {}", .status.map_or_else(|| "killed".to_string(), |c| format!("exit {c}")), .stderr.trim())]
    CommandFailed {
        /// Command line that was run
        command: String,
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// Listing output is not JSON
    #[error("configuration listing is not valid JSON: {0}")]
    InvalidListing(#[from] serde_json::Error),

    /// Listing has no such namespace
    #[error("configuration listing has no '{0}' section")]
    MissingNamespace(String),

    /// Namespace section is not a mapping
    #[error("configuration section '{namespace}' is malformed: {source}")]
    MalformedNamespace {
        /// Namespace name
        namespace: String,
        /// Conversion failure
        #[source]
        source: ValueError,
    },

    /// A store refused a primitive
    #[error("store rejected '{0}'")]
    Rejected(String),
}

/// Declared configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Invalid YAML
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid TOML
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parsed, but not a mapping
    #[error("invalid configuration: {0}")]
    Shape(#[from] ValueError),
}

/// Convergence errors
///
/// All are fatal. Nothing is retried and nothing is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum ConvergeError {
    /// Current configuration could not be listed
    #[error("failed to read current configuration: {0}")]
    Listing(#[source] StoreError),

    /// Declared tree conflicts with the current configuration
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// An operation failed; earlier operations remain applied
    #[error("failed to {operation} after {applied} applied operation(s): {source}")]
    Execution {
        /// Operation that failed
        operation: Operation,
        /// Operations applied before the failure
        applied: usize,
        /// Store error
        #[source]
        source: StoreError,
    },
}

impl ConvergeError {
    /// Whether the live store was left partially converged
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Execution { applied, .. } if *applied > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_message_includes_status_and_stderr() {
        let err = StoreError::CommandFailed {
            command: "php occ config:list".into(),
            status: Some(1),
            stderr: "Nextcloud is not installed\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "'php occ config:list' failed (exit 1): Nextcloud is not installed"
        );
    }

    #[test]
    fn partial_only_after_applied_operations() {
        let first = ConvergeError::Execution {
            operation: Operation::delete("a"),
            applied: 0,
            source: StoreError::Rejected("delete a".into()),
        };
        let later = ConvergeError::Execution {
            operation: Operation::delete("b"),
            applied: 2,
            source: StoreError::Rejected("delete b".into()),
        };
        assert!(!first.is_partial());
        assert!(later.is_partial());
        assert!(later.to_string().starts_with("failed to delete b after 2"));
    }
}
