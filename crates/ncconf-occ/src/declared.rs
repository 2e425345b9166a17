//! Loading declared configuration trees from files
//!
//! YAML, JSON and TOML documents are accepted. The top level must be a
//! mapping of configuration keys.

use std::path::Path;

use ncconf_core::{tree_from_json, ConfigTree};
use serde_json::Value as JsonValue;

use crate::error::LoadError;

/// Declared configuration document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// YAML (also the fallback)
    #[default]
    Yaml,
    /// JSON
    Json,
    /// TOML
    Toml,
}

impl Format {
    /// Guess the format from a file extension, defaulting to YAML
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Parse a declared tree from text
///
/// An empty document yields an empty tree.
///
/// # Errors
/// Returns [`LoadError`] if the text does not parse or is not a mapping
pub fn parse_declared(text: &str, format: Format) -> Result<ConfigTree, LoadError> {
    if text.trim().is_empty() {
        return Ok(ConfigTree::new());
    }

    let value: JsonValue = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Toml => toml::from_str(text)?,
        // Go through serde_yaml's own value so integer keys become strings
        Format::Yaml => serde_json::to_value(serde_yaml::from_str::<serde_yaml::Value>(text)?)?,
    };

    Ok(tree_from_json(value)?)
}

/// Load a declared tree from a file, picking the format by extension
///
/// # Errors
/// Returns [`LoadError`] if the file cannot be read or parsed
pub fn load_declared(path: impl AsRef<Path>) -> Result<ConfigTree, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded declared configuration");
    parse_declared(&text, Format::from_path(path))
}
