//! occ invocation settings

use serde::{Deserialize, Serialize};

/// Environment variable overriding the PHP binary
pub const PHP_ENV: &str = "NCCONF_PHP";

/// How occ is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccSettings {
    /// PHP interpreter used to run occ
    pub php_binary: String,
    /// Pass `--private` when listing, so secrets are compared too
    pub include_private: bool,
}

impl OccSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults, overridden through `lookup`
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(php) = lookup(PHP_ENV).filter(|v| !v.trim().is_empty()) {
            settings.php_binary = php;
        }
        settings
    }

    /// With PHP binary
    #[inline]
    #[must_use]
    pub fn with_php_binary(mut self, php: impl Into<String>) -> Self {
        self.php_binary = php.into();
        self
    }

    /// With private values in listings
    #[inline]
    #[must_use]
    pub fn with_private(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }
}

impl Default for OccSettings {
    fn default() -> Self {
        Self {
            php_binary: "php".to_string(),
            include_private: true,
        }
    }
}
