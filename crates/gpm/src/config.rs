//! Seeding registries from configuration files.
//!
//! A seed file names its groups. Each group has a key and the permissions
//! granted to it, either as a raw bitmask, as bit positions, or both:
//!
//! ```toml
//! [groups.write]
//! key = 0
//! permissions = 1
//!
//! [groups.read]
//! key = 1
//! bits = [0, 1]
//! ```
//!
//! Group names double as the override path for environment variables, so
//! `GPM__GROUPS__READ__PERMISSIONS=4` adds bit 2 to the `read` group above.
//! Names should be lowercase `snake_case` to stay addressable.

use crate::error::{RegistryError, RegistryErrorExt, Result};
use crate::key::GroupKey;
use crate::permission::Permission;
use crate::registry::PermissionRegistry;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "permissions";
const ENV_PREFIX: &str = "GPM";

/// The seed of a [`PermissionRegistry`], groups keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub groups: BTreeMap<String, GroupConfig>,
}

/// One named group of a [`RegistryConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub key: GroupKey,
    #[serde(default)]
    pub permissions: Option<Permission>,
    #[serde(default)]
    pub bits: Vec<u32>,
}

impl GroupConfig {
    /// The union of `permissions` and every listed bit position.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidBit`] if a bit position is 64 or more.
    pub fn permission(&self) -> Result<Permission> {
        self.bits.iter().try_fold(self.permissions.unwrap_or_default(), |acc, &bit| {
            Permission::try_bit(bit)
                .map(|single| acc | single)
                .ok_or(RegistryError::InvalidBit { bit, context: None })
        })
    }
}

impl TryFrom<RegistryConfig> for PermissionRegistry {
    type Error = RegistryError;

    /// Populates a registry with `add`, so names sharing a key merge their grants.
    fn try_from(config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_capacity(config.groups.len());
        for (name, group) in &config.groups {
            let permission =
                group.permission().context(format!("group {} '{name}'", group.key))?;
            debug!(key = %group.key, %name, %permission, "Seeding group");
            registry.add(group.key, permission);
        }
        Ok(registry)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .convert_case(config::Case::Snake)
}

/// Loads a configuration file overlaid with environment overrides.
///
/// 1. **Base File**: the file at `path` (format inferred from the extension), or
///    `permissions.*` in the working directory when no path is given.
/// 2. **Environment Overrides**: variables prefixed with `GPM__`, nested with
///    double underscores (e.g. `GPM__GROUPS__READ__PERMISSIONS`). Lists such
///    as `bits` cannot be overridden this way.
///
/// # Errors
/// Returns [`RegistryError::Config`] if the file is missing, unreadable, or
/// does not match `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T>
where
    T: DeserializeOwned,
{
    load_layered(path, environment())
}

fn load_layered<T>(path: Option<impl AsRef<Path>>, environment: Environment) -> Result<T>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(environment);

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads a [`RegistryConfig`] with [`load_config`] and builds the registry from it.
///
/// # Errors
/// Returns [`RegistryError::Config`] when loading fails and
/// [`RegistryError::InvalidBit`] for out-of-range bit positions.
pub fn load_registry(path: Option<impl AsRef<Path>>) -> Result<PermissionRegistry> {
    let config = load_config::<RegistryConfig>(path)?;
    let registry = PermissionRegistry::try_from(config)?;
    info!(groups = registry.len(), "Permission registry seeded");
    Ok(registry)
}
