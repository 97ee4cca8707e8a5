//! # Group Permission Map
//!
//! A minimal in-memory permission registry. Each [`GroupKey`] names a group of
//! related capabilities and maps to a [`Permission`] bitmask, where every bit is
//! one atomic capability. Access decisions are a single lookup plus a subset test,
//! so every check is O(1).
//!
//! * Keys and bits mean whatever the caller decides; the registry never
//!   interprets them. [`group_keys!`] and [`permissions!`] generate the usual
//!   sequential constants.
//! * A missing group and a group explicitly set to the empty set answer every
//!   [`PermissionRegistry::get`] identically.
//! * Writing through a handle that denotes no registry at all (`None` behind a
//!   [`PermissionGrant`] handle) is a programming error and panics, while reads
//!   through the same handle degrade to "not found".
//!
//! ## Example
//!
//! ```rust
//! use gpm::prelude::*;
//!
//! gpm::group_keys!(WRITE_KEY, READ_KEY);
//! gpm::permissions!(WRITE_NAME, WRITE_LAST_NAME);
//! gpm::permissions!(READ_NAME, READ_LAST_NAME);
//!
//! let registry = PermissionRegistry::from([
//!     (WRITE_KEY, WRITE_NAME),
//!     (READ_KEY, READ_NAME | READ_LAST_NAME),
//! ]);
//!
//! assert!(registry.get(READ_KEY).contains(READ_NAME));
//! assert!(!registry.get(WRITE_KEY).contains(WRITE_NAME | WRITE_LAST_NAME));
//! ```

#[cfg(feature = "config")]
pub mod config;
mod error;
mod key;
mod macros;
mod permission;
mod registry;

pub mod prelude;

pub use crate::error::{RegistryError, RegistryErrorExt, Result};
pub use crate::key::GroupKey;
pub use crate::permission::Permission;
pub use crate::registry::{PermissionGrant, PermissionLookup, PermissionRegistry};
