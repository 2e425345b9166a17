//! Store backed by Nextcloud's occ command line tool
//!
//! Listing runs `occ config:list --output=json` once and keeps the `system`
//! section. Mutations map onto `occ config:system:set` and
//! `occ config:system:delete`, one process per operation.

use std::path::Path;

use ncconf_core::{tree_from_json, ConfigTree, ScalarKind, ScalarValue};
use serde_json::Value as JsonValue;

use crate::error::StoreError;
use crate::install::OccInstall;
use crate::runner::{command_line, CommandRunner, ProcessRunner};
use crate::settings::OccSettings;
use crate::store::ConfigStore;

/// Section of `config:list` holding the system configuration
pub const SYSTEM_NAMESPACE: &str = "system";

/// occ `--type` label for a scalar kind
#[inline]
#[must_use]
pub fn type_label(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "string",
        ScalarKind::Integer => "integer",
        ScalarKind::Boolean => "boolean",
        ScalarKind::Float => "float",
    }
}

/// occ-backed configuration store
#[derive(Debug)]
pub struct OccStore<R = ProcessRunner> {
    install: OccInstall,
    settings: OccSettings,
    runner: R,
}

impl OccStore<ProcessRunner> {
    /// Locate the installation at `path` and run occ as a real process
    ///
    /// # Errors
    /// Returns [`StoreError`] if the installation cannot be located
    pub fn open(path: impl AsRef<Path>, settings: OccSettings) -> Result<Self, StoreError> {
        let install = OccInstall::locate(path)?;
        Ok(Self::with_runner(install, settings, ProcessRunner))
    }
}

impl<R: CommandRunner> OccStore<R> {
    /// Create with a custom runner
    #[inline]
    #[must_use]
    pub fn with_runner(install: OccInstall, settings: OccSettings, runner: R) -> Self {
        Self {
            install,
            settings,
            runner,
        }
    }

    /// Installation this store talks to
    #[inline]
    #[must_use]
    pub fn install(&self) -> &OccInstall {
        &self.install
    }

    fn occ(&self, args: Vec<String>) -> Result<String, StoreError> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(OccInstall::SCRIPT.to_string());
        argv.extend(args);
        tracing::debug!(command = %command_line(&self.settings.php_binary, &argv), "running occ");
        self.runner.run(&self.settings.php_binary, &argv, self.install.dir())
    }

    fn set_args(key: &str, subkey: Option<&str>, value: &ScalarValue, kind: ScalarKind) -> Vec<String> {
        let mut args = vec!["config:system:set".to_string(), key.to_string()];
        args.extend(subkey.map(str::to_string));
        args.push(format!("--value={value}"));
        args.push(format!("--type={}", type_label(kind)));
        args
    }

    fn delete_args(key: &str, subkey: Option<&str>) -> Vec<String> {
        let mut args = vec!["config:system:delete".to_string(), key.to_string()];
        args.extend(subkey.map(str::to_string));
        args
    }
}

impl<R: CommandRunner> ConfigStore for OccStore<R> {
    fn list_current_config(&mut self) -> Result<ConfigTree, StoreError> {
        let mut args = vec!["config:list".to_string(), "--output=json".to_string()];
        if self.settings.include_private {
            args.push("--private".to_string());
        }
        let stdout = self.occ(args)?;

        let mut listing: JsonValue = serde_json::from_str(&stdout)?;
        let section = listing
            .get_mut(SYSTEM_NAMESPACE)
            .map(JsonValue::take)
            .ok_or_else(|| StoreError::MissingNamespace(SYSTEM_NAMESPACE.to_string()))?;

        tree_from_json(section).map_err(|source| StoreError::MalformedNamespace {
            namespace: SYSTEM_NAMESPACE.to_string(),
            source,
        })
    }

    fn apply_set(&mut self, key: &str, value: &ScalarValue, kind: ScalarKind) -> Result<(), StoreError> {
        self.occ(Self::set_args(key, None, value, kind)).map(drop)
    }

    fn apply_delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.occ(Self::delete_args(key, None)).map(drop)
    }

    fn apply_set_nested(
        &mut self,
        key: &str,
        subkey: &str,
        value: &ScalarValue,
        kind: ScalarKind,
    ) -> Result<(), StoreError> {
        self.occ(Self::set_args(key, Some(subkey), value, kind)).map(drop)
    }

    fn apply_delete_nested(&mut self, key: &str, subkey: &str) -> Result<(), StoreError> {
        self.occ(Self::delete_args(key, Some(subkey))).map(drop)
    }
}
