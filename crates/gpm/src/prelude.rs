//! Everything needed to populate and query a registry.

pub use crate::error::{RegistryError, RegistryErrorExt};
pub use crate::key::GroupKey;
pub use crate::permission::Permission;
pub use crate::registry::{PermissionGrant, PermissionLookup, PermissionRegistry};
