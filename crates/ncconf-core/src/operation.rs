//! Store mutations produced by reconciliation
//!
//! Operations carry no handle on the store; a collaborator executes them in
//! the order they were produced.

use std::fmt;

use serde::Serialize;

use crate::value::{ConfigTree, ConfigValue, ScalarKind, ScalarValue};

/// A single not-yet-executed mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Set a top-level scalar
    SetScalar {
        /// Configuration key
        key: String,
        /// New value
        value: ScalarValue,
        /// Kind of `value`
        kind: ScalarKind,
    },

    /// Set one entry of a top-level map
    SetNested {
        /// Configuration key
        key: String,
        /// Entry within the map
        subkey: String,
        /// New value
        value: ScalarValue,
        /// Kind of `value`
        kind: ScalarKind,
    },

    /// Delete a top-level key, whatever its shape
    DeleteScalar {
        /// Configuration key
        key: String,
    },

    /// Delete one entry of a top-level map
    DeleteNested {
        /// Configuration key
        key: String,
        /// Entry within the map
        subkey: String,
    },
}

impl Operation {
    /// Set a top-level scalar, tagging it with its kind
    #[inline]
    #[must_use]
    pub fn set(key: impl Into<String>, value: ScalarValue) -> Self {
        let kind = value.kind();
        Self::SetScalar {
            key: key.into(),
            value,
            kind,
        }
    }

    /// Set a map entry, tagging it with its kind
    #[inline]
    #[must_use]
    pub fn set_nested(key: impl Into<String>, subkey: impl Into<String>, value: ScalarValue) -> Self {
        let kind = value.kind();
        Self::SetNested {
            key: key.into(),
            subkey: subkey.into(),
            value,
            kind,
        }
    }

    /// Delete a top-level key
    #[inline]
    #[must_use]
    pub fn delete(key: impl Into<String>) -> Self {
        Self::DeleteScalar { key: key.into() }
    }

    /// Delete a map entry
    #[inline]
    #[must_use]
    pub fn delete_nested(key: impl Into<String>, subkey: impl Into<String>) -> Self {
        Self::DeleteNested {
            key: key.into(),
            subkey: subkey.into(),
        }
    }

    /// Top-level key targeted by this operation
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::SetScalar { key, .. }
            | Self::SetNested { key, .. }
            | Self::DeleteScalar { key }
            | Self::DeleteNested { key, .. } => key,
        }
    }

    /// Whether this operation removes something
    #[inline]
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::DeleteScalar { .. } | Self::DeleteNested { .. })
    }

    /// Apply the operation to an in-memory tree
    ///
    /// Setting an entry on a key that is not a map replaces it with a new
    /// map. Deleting something that is not there does nothing.
    pub fn apply_to(&self, tree: &mut ConfigTree) {
        match self {
            Self::SetScalar { key, value, .. } => {
                tree.insert(key.clone(), ConfigValue::Scalar(value.clone()));
            }
            Self::SetNested {
                key, subkey, value, ..
            } => {
                let slot = tree
                    .entry(key.clone())
                    .or_insert_with(|| ConfigValue::Map(ConfigTree::new()));
                if !matches!(slot, ConfigValue::Map(_)) {
                    *slot = ConfigValue::Map(ConfigTree::new());
                }
                if let ConfigValue::Map(map) = slot {
                    map.insert(subkey.clone(), ConfigValue::Scalar(value.clone()));
                }
            }
            Self::DeleteScalar { key } => {
                tree.shift_remove(key);
            }
            Self::DeleteNested { key, subkey } => {
                if let Some(ConfigValue::Map(map)) = tree.get_mut(key) {
                    map.shift_remove(subkey);
                }
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetScalar { key, value, .. } => write!(f, "set {key} = {value}"),
            Self::SetNested {
                key, subkey, value, ..
            } => write!(f, "set {key}.{subkey} = {value}"),
            Self::DeleteScalar { key } => write!(f, "delete {key}"),
            Self::DeleteNested { key, subkey } => write!(f, "delete {key}.{subkey}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::tree_from_json;
    use serde_json::json;

    #[test]
    fn constructors_tag_kind() {
        let op = Operation::set("loglevel", ScalarValue::Integer(2));
        assert!(matches!(op, Operation::SetScalar { kind: ScalarKind::Integer, .. }));

        let op = Operation::set_nested("redis", "host", "localhost".into());
        assert!(matches!(op, Operation::SetNested { kind: ScalarKind::String, .. }));
    }

    #[test]
    fn apply_set_nested_creates_map() {
        let mut tree = ConfigTree::new();
        Operation::set_nested("redis", "port", ScalarValue::Integer(6379)).apply_to(&mut tree);
        assert_eq!(tree, tree_from_json(json!({"redis": {"port": 6379}})).unwrap());
    }

    #[test]
    fn apply_set_nested_replaces_scalar() {
        let mut tree = tree_from_json(json!({"redis": "off"})).unwrap();
        Operation::set_nested("redis", "host", "cache".into()).apply_to(&mut tree);
        assert_eq!(tree, tree_from_json(json!({"redis": {"host": "cache"}})).unwrap());
    }

    #[test]
    fn apply_deletes() {
        let mut tree = tree_from_json(json!({"a": 1, "b": {"x": 1, "y": 2}})).unwrap();
        Operation::delete("a").apply_to(&mut tree);
        Operation::delete_nested("b", "x").apply_to(&mut tree);
        Operation::delete("missing").apply_to(&mut tree);
        assert_eq!(tree, tree_from_json(json!({"b": {"y": 2}})).unwrap());
    }

    #[test]
    fn serializes_with_op_tag() {
        let op = Operation::set_nested("redis", "port", ScalarValue::Integer(6379));
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "set_nested", "key": "redis", "subkey": "port", "value": 6379, "kind": "integer"})
        );
        assert_eq!(
            serde_json::to_value(Operation::delete("a")).unwrap(),
            json!({"op": "delete_scalar", "key": "a"})
        );
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Operation::delete_nested("a", "b").to_string(), "delete a.b");
        assert_eq!(
            Operation::set("maintenance", ScalarValue::Boolean(true)).to_string(),
            "set maintenance = true"
        );
    }
}
