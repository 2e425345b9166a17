//! Store abstraction the convergence driver talks to

use ncconf_core::{ConfigTree, Operation, ScalarKind, ScalarValue};

use crate::error::StoreError;

/// A live configuration store
///
/// Implementations provide a one-shot listing and four mutation primitives.
/// [`ConfigStore::apply`] dispatches an [`Operation`] onto them.
pub trait ConfigStore {
    /// Snapshot of the current configuration
    ///
    /// # Errors
    /// Returns [`StoreError`] if the store cannot be read
    fn list_current_config(&mut self) -> Result<ConfigTree, StoreError>;

    /// Set a top-level scalar
    ///
    /// # Errors
    /// Returns [`StoreError`] if the store rejects the change
    fn apply_set(&mut self, key: &str, value: &ScalarValue, kind: ScalarKind) -> Result<(), StoreError>;

    /// Delete a top-level key
    ///
    /// # Errors
    /// Returns [`StoreError`] if the store rejects the change
    fn apply_delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// Set one entry of a top-level map
    ///
    /// # Errors
    /// Returns [`StoreError`] if the store rejects the change
    fn apply_set_nested(
        &mut self,
        key: &str,
        subkey: &str,
        value: &ScalarValue,
        kind: ScalarKind,
    ) -> Result<(), StoreError>;

    /// Delete one entry of a top-level map
    ///
    /// # Errors
    /// Returns [`StoreError`] if the store rejects the change
    fn apply_delete_nested(&mut self, key: &str, subkey: &str) -> Result<(), StoreError>;

    /// Execute one operation
    ///
    /// # Errors
    /// Propagates the primitive's [`StoreError`]
    fn apply(&mut self, operation: &Operation) -> Result<(), StoreError> {
        match operation {
            Operation::SetScalar { key, value, kind } => self.apply_set(key, value, *kind),
            Operation::SetNested {
                key,
                subkey,
                value,
                kind,
            } => self.apply_set_nested(key, subkey, value, *kind),
            Operation::DeleteScalar { key } => self.apply_delete(key),
            Operation::DeleteNested { key, subkey } => self.apply_delete_nested(key, subkey),
        }
    }
}
