//! Convergence driver
//!
//! One run lists the store once, reconciles, then applies the resulting
//! operations in order unless running dry. The first failing operation stops
//! the run; operations already applied stay applied.

use ncconf_core::{reconcile, ConfigTree, Operation, Policy};
use serde::{Deserialize, Serialize};

use crate::error::ConvergeError;
use crate::store::ConfigStore;

/// Options for a convergence run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergeOptions {
    /// Whether declared keys should be present or absent
    pub policy: Policy,
    /// Compute and report, but apply nothing
    pub dry_run: bool,
}

impl ConvergeOptions {
    /// Options for `policy`, applying changes
    #[inline]
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            dry_run: false,
        }
    }

    /// With dry run
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of a convergence run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergeReport {
    /// Whether the store differs (or differed) from the declared state
    pub changed: bool,
    /// Whether application was skipped
    pub dry_run: bool,
    /// Policy the run used
    pub policy: Policy,
    /// Operations computed, in order
    pub operations: Vec<Operation>,
    /// Operations actually applied
    pub applied: usize,
}

/// Converge `store` towards `declared`
///
/// # Errors
/// - [`ConvergeError::Listing`] if the current configuration cannot be read
/// - [`ConvergeError::Reconcile`] on a shape conflict; nothing is applied
/// - [`ConvergeError::Execution`] when an operation fails; earlier
///   operations remain applied
pub fn converge<S: ConfigStore + ?Sized>(
    store: &mut S,
    declared: &ConfigTree,
    options: ConvergeOptions,
) -> Result<ConvergeReport, ConvergeError> {
    let observed = store.list_current_config().map_err(ConvergeError::Listing)?;
    tracing::debug!(
        declared = declared.len(),
        observed = observed.len(),
        policy = %options.policy,
        "reconciling"
    );

    let plan = reconcile(declared, &observed, options.policy)?;
    let changed = plan.changed();
    let operations = plan.into_operations();

    let mut applied = 0;
    if options.dry_run {
        for operation in &operations {
            tracing::info!("would {operation}");
        }
    } else {
        for operation in &operations {
            tracing::debug!("applying {operation}");
            if let Err(source) = store.apply(operation) {
                tracing::warn!(applied, "failed to {operation}: {source}");
                return Err(ConvergeError::Execution {
                    operation: operation.clone(),
                    applied,
                    source,
                });
            }
            applied += 1;
        }
    }

    tracing::info!(
        changed,
        dry_run = options.dry_run,
        planned = operations.len(),
        applied,
        "convergence finished"
    );

    Ok(ConvergeReport {
        changed,
        dry_run: options.dry_run,
        policy: options.policy,
        operations,
        applied,
    })
}
