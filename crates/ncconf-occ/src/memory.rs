//! In-memory configuration store
//!
//! Applies operations to a [`ConfigTree`] and records them. Used to preview
//! the converged tree and to exercise the driver without spawning occ.

use ncconf_core::{ConfigTree, Operation, ScalarKind, ScalarValue};

use crate::error::StoreError;
use crate::store::ConfigStore;

/// Store holding its configuration in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tree: ConfigTree,
    applied: Vec<Operation>,
    listings: usize,
    reject_at: Option<usize>,
}

impl MemoryStore {
    /// Create a store seeded with `tree`
    #[inline]
    #[must_use]
    pub fn new(tree: ConfigTree) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    /// Reject the mutation with the given zero-based index
    #[inline]
    #[must_use]
    pub fn rejecting_at(mut self, index: usize) -> Self {
        self.reject_at = Some(index);
        self
    }

    /// Current configuration
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Operations applied so far, in order
    #[inline]
    #[must_use]
    pub fn applied(&self) -> &[Operation] {
        &self.applied
    }

    /// Number of times the configuration was listed
    #[inline]
    #[must_use]
    pub fn listings(&self) -> usize {
        self.listings
    }

    fn record(&mut self, operation: Operation) -> Result<(), StoreError> {
        if self.reject_at == Some(self.applied.len()) {
            return Err(StoreError::Rejected(operation.to_string()));
        }
        operation.apply_to(&mut self.tree);
        self.applied.push(operation);
        Ok(())
    }
}

impl ConfigStore for MemoryStore {
    fn list_current_config(&mut self) -> Result<ConfigTree, StoreError> {
        self.listings += 1;
        Ok(self.tree.clone())
    }

    fn apply_set(&mut self, key: &str, value: &ScalarValue, kind: ScalarKind) -> Result<(), StoreError> {
        self.record(Operation::SetScalar {
            key: key.to_string(),
            value: value.clone(),
            kind,
        })
    }

    fn apply_delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.record(Operation::delete(key))
    }

    fn apply_set_nested(
        &mut self,
        key: &str,
        subkey: &str,
        value: &ScalarValue,
        kind: ScalarKind,
    ) -> Result<(), StoreError> {
        self.record(Operation::SetNested {
            key: key.to_string(),
            subkey: subkey.to_string(),
            value: value.clone(),
            kind,
        })
    }

    fn apply_delete_nested(&mut self, key: &str, subkey: &str) -> Result<(), StoreError> {
        self.record(Operation::delete_nested(key, subkey))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncconf_core::tree_from_json;
    use serde_json::json;

    #[test]
    fn applies_and_records_operations() {
        let mut store = MemoryStore::new(tree_from_json(json!({"a": 1})).unwrap());
        store.apply(&Operation::delete("a")).unwrap();
        store
            .apply(&Operation::set_nested("b", "x", ScalarValue::Boolean(true)))
            .unwrap();

        assert_eq!(store.tree(), &tree_from_json(json!({"b": {"x": true}})).unwrap());
        assert_eq!(store.applied().len(), 2);
    }

    #[test]
    fn rejection_leaves_tree_untouched() {
        let mut store = MemoryStore::new(ConfigTree::new()).rejecting_at(1);
        store.apply(&Operation::set("a", ScalarValue::Integer(1))).unwrap();
        let err = store.apply(&Operation::set("b", ScalarValue::Integer(2))).unwrap_err();

        assert!(matches!(err, StoreError::Rejected(op) if op == "set b = 2"));
        assert_eq!(store.tree().len(), 1);
        assert_eq!(store.applied().len(), 1);
    }

    #[test]
    fn listing_is_counted() {
        let mut store = MemoryStore::default();
        store.list_current_config().unwrap();
        store.list_current_config().unwrap();
        assert_eq!(store.listings(), 2);
    }
}
