//! ncconf Core
//!
//! Pure reconciliation of a declared configuration tree against an observed
//! snapshot of a live store.
//!
//! # Core Concepts
//!
//! - [`ConfigValue`]: Tagged value (scalar, nested map, list, empty)
//! - [`ConfigTree`]: Ordered mapping of keys to values
//! - [`Policy`]: Whether declared keys should be present or absent
//! - [`Operation`]: A not-yet-executed set/delete against the store
//! - [`reconcile`]: Diff that produces the operations for one run
//!
//! # Example
//!
//! ```
//! use ncconf_core::{reconcile, tree_from_json, Policy};
//! use serde_json::json;
//!
//! let declared = tree_from_json(json!({"maintenance": false})).unwrap();
//! let observed = tree_from_json(json!({"maintenance": true})).unwrap();
//!
//! let plan = reconcile(&declared, &observed, Policy::Present).unwrap();
//! assert!(plan.changed());
//! assert_eq!(plan.operations().len(), 1);
//! ```

mod error;
mod operation;
mod policy;
mod reconcile;
mod value;

pub use error::{ReconcileError, ValueError};
pub use operation::Operation;
pub use policy::{ParsePolicyError, Policy};
pub use reconcile::{reconcile, Reconciliation};
pub use value::{tree_from_json, ConfigTree, ConfigValue, ScalarKind, ScalarValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
