//! Error types for reconciliation and value conversion

/// Fatal reconciliation failures
///
/// Any of these aborts the whole run; no operations are returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// Declared nested map where the observed value is not a map
    #[error("incompatible parameter '{key}': declared as a map but the current value is not")]
    ShapeMismatch {
        /// Offending top-level key
        key: String,
    },

    /// Declared value has a shape the store cannot express (lists, deep maps)
    #[error("incompatible parameter '{key}': lists and deeper nesting are not supported")]
    UnsupportedShape {
        /// Offending key, `key.subkey` for nested values
        key: String,
    },
}

impl ReconcileError {
    /// Key the error refers to
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::ShapeMismatch { key } | Self::UnsupportedShape { key } => key,
        }
    }
}

/// Value conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A configuration tree must be a mapping at the top level
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping {
        /// JSON type name of what was found instead
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_key() {
        let err = ReconcileError::ShapeMismatch { key: "trusted_domains".into() };
        assert!(err.to_string().contains("trusted_domains"));
        assert_eq!(err.key(), "trusted_domains");

        let err = ReconcileError::UnsupportedShape { key: "redis.extra".into() };
        assert_eq!(err.key(), "redis.extra");
    }
}
