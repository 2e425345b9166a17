//! Declared-versus-observed tree diff
//!
//! [`reconcile`] walks the declared tree once, in declared order, and decides
//! per key whether to set, delete or skip. It performs no I/O; the observed
//! tree is a snapshot taken before the run.
//!
//! Declared maps are additive: entries present only in the observed map are
//! never touched, under either policy.

use crate::error::ReconcileError;
use crate::operation::Operation;
use crate::policy::Policy;
use crate::value::{ConfigTree, ConfigValue, ScalarValue};

/// Outcome of a successful reconciliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    operations: Vec<Operation>,
}

impl Reconciliation {
    /// Operations in execution order
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consume into the operation list
    #[inline]
    #[must_use]
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Whether converging requires any change
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Whether there is nothing to do
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Shape of a declared value, as far as the diff cares
enum Declared<'a> {
    Map(&'a ConfigTree),
    Scalar(&'a ScalarValue),
    Empty,
    List,
}

impl<'a> Declared<'a> {
    fn classify(value: &'a ConfigValue) -> Self {
        match value {
            _ if value.is_empty() => Self::Empty,
            ConfigValue::Map(map) => Self::Map(map),
            ConfigValue::Scalar(scalar) => Self::Scalar(scalar),
            ConfigValue::List(_) => Self::List,
            ConfigValue::Empty => Self::Empty,
        }
    }

    /// Inside a map `""` is a settable string; only null and `{}` are empty
    fn classify_nested(value: &'a ConfigValue) -> Self {
        match value {
            ConfigValue::Scalar(scalar) => Self::Scalar(scalar),
            _ => Self::classify(value),
        }
    }
}

/// Compute the operations converging `observed` towards `declared`
///
/// # Errors
/// - [`ReconcileError::ShapeMismatch`] if a declared map meets an observed
///   non-map value
/// - [`ReconcileError::UnsupportedShape`] if a declared value is a list, or a
///   map entry is itself a non-empty map or a list
///
/// The first error aborts the run and nothing computed so far is returned.
pub fn reconcile(
    declared: &ConfigTree,
    observed: &ConfigTree,
    policy: Policy,
) -> Result<Reconciliation, ReconcileError> {
    let mut operations = Vec::new();

    for (key, value) in declared {
        let current = observed.get(key);
        match Declared::classify(value) {
            Declared::Map(entries) => {
                reconcile_map(key, entries, current, policy, &mut operations)?;
            }
            Declared::Scalar(scalar) => match (policy, current) {
                (Policy::Absent, Some(_)) => operations.push(Operation::delete(key)),
                (Policy::Absent, None) => {}
                (Policy::Present, Some(ConfigValue::Scalar(existing))) if scalar.matches(existing) => {}
                (Policy::Present, _) => operations.push(Operation::set(key, scalar.clone())),
            },
            Declared::Empty => {
                if policy == Policy::Absent && current.is_some() {
                    operations.push(Operation::delete(key));
                }
            }
            Declared::List => {
                return Err(ReconcileError::UnsupportedShape { key: key.clone() });
            }
        }
    }

    Ok(Reconciliation { operations })
}

fn reconcile_map(
    key: &str,
    entries: &ConfigTree,
    current: Option<&ConfigValue>,
    policy: Policy,
    operations: &mut Vec<Operation>,
) -> Result<(), ReconcileError> {
    let existing = match current {
        None => None,
        Some(ConfigValue::Map(map)) => Some(map),
        Some(_) => {
            return Err(ReconcileError::ShapeMismatch {
                key: key.to_string(),
            })
        }
    };

    for (subkey, value) in entries {
        let observed = existing.and_then(|map| map.get(subkey));
        match Declared::classify_nested(value) {
            Declared::Scalar(scalar) => match (policy, observed) {
                (Policy::Absent, Some(_)) => {
                    operations.push(Operation::delete_nested(key, subkey));
                }
                (Policy::Absent, None) => {}
                (Policy::Present, Some(ConfigValue::Scalar(seen))) if scalar.matches(seen) => {}
                (Policy::Present, _) => {
                    operations.push(Operation::set_nested(key, subkey, scalar.clone()));
                }
            },
            Declared::Empty => {
                if policy == Policy::Absent && observed.is_some() {
                    operations.push(Operation::delete_nested(key, subkey));
                }
            }
            Declared::Map(_) | Declared::List => {
                return Err(ReconcileError::UnsupportedShape {
                    key: format!("{key}.{subkey}"),
                });
            }
        }
    }

    Ok(())
}
