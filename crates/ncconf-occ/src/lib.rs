//! ncconf occ store
//!
//! The side-effecting half of ncconf: reading the live Nextcloud
//! configuration through `occ`, applying the operations computed by
//! [`ncconf_core::reconcile`], and the [`converge`] driver tying both
//! together.
//!
//! # Example
//!
//! ```rust,no_run
//! use ncconf_occ::{converge, load_declared, ConvergeOptions, OccSettings, OccStore};
//! use ncconf_core::Policy;
//!
//! let declared = load_declared("nextcloud.yaml")?;
//! let mut store = OccStore::open("/var/www/nextcloud", OccSettings::from_env())?;
//! let report = converge(&mut store, &declared, ConvergeOptions::new(Policy::Present))?;
//! println!("changed: {}", report.changed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod converge;
mod declared;
mod error;
mod install;
mod memory;
mod occ;
mod runner;
mod settings;
mod store;

pub use converge::{converge, ConvergeOptions, ConvergeReport};
pub use declared::{load_declared, parse_declared, Format};
pub use error::{ConvergeError, LoadError, StoreError};
pub use install::OccInstall;
pub use memory::MemoryStore;
pub use occ::{type_label, OccStore, SYSTEM_NAMESPACE};
pub use runner::{CommandRunner, ProcessRunner};
pub use settings::{OccSettings, PHP_ENV};
pub use store::ConfigStore;
