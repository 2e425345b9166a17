//! Locating a Nextcloud installation's occ script

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// A Nextcloud install directory known to contain a readable `occ`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccInstall {
    dir: PathBuf,
}

impl OccInstall {
    /// File name of the administration script
    pub const SCRIPT: &'static str = "occ";

    /// Resolve an install directory from `path`
    ///
    /// `path` may be the install directory itself or the `occ` script inside
    /// it.
    ///
    /// # Errors
    /// - [`StoreError::InvalidInstallDir`] if the directory does not exist
    /// - [`StoreError::ToolNotFound`] if it has no `occ`
    /// - [`StoreError::NotAccessible`] if `occ` cannot be opened; occ must be
    ///   run as the owner of the file
    pub fn locate(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let dir = if path.file_name().is_some_and(|name| name == Self::SCRIPT) {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        } else {
            path.to_path_buf()
        };

        if !dir.is_dir() {
            return Err(StoreError::InvalidInstallDir(dir));
        }

        let script = dir.join(Self::SCRIPT);
        if !script.is_file() {
            return Err(StoreError::ToolNotFound(dir));
        }
        File::open(&script).map_err(|source| StoreError::NotAccessible {
            path: script.clone(),
            source,
        })?;

        tracing::debug!(dir = %dir.display(), "located occ");
        Ok(Self { dir })
    }

    /// Install directory, used as the working directory for occ
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the occ script
    #[inline]
    #[must_use]
    pub fn script(&self) -> PathBuf {
        self.dir.join(Self::SCRIPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("occ"), "<?php\n").unwrap();
        dir
    }

    #[test]
    fn locate_from_directory() {
        let dir = install_dir();
        let install = OccInstall::locate(dir.path()).unwrap();
        assert_eq!(install.dir(), dir.path());
        assert_eq!(install.script(), dir.path().join("occ"));
    }

    #[test]
    fn locate_from_script_path() {
        let dir = install_dir();
        let install = OccInstall::locate(dir.path().join("occ")).unwrap();
        assert_eq!(install.dir(), dir.path());
    }

    #[test]
    fn missing_directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let err = OccInstall::locate(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInstallDir(_)));
    }

    #[test]
    fn directory_without_occ_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = OccInstall::locate(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::ToolNotFound(p) if p == dir.path()));
    }
}
