use anyhow::{Result, bail};
use gpm::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Loads the registry seed, or starts from an empty registry when none is given.
pub(crate) fn load(path: Option<&Path>) -> Result<PermissionRegistry> {
    let Some(path) = path else {
        info!("No seed file given, starting with an empty registry");
        return Ok(PermissionRegistry::new());
    };

    Ok(gpm::config::load_registry(Some(path))?)
}

/// Turns a negative `contains` answer into a command failure.
pub(crate) fn authorize(
    registry: &impl PermissionLookup,
    key: GroupKey,
    required: Permission,
) -> Result<()> {
    let granted = registry.get(key);
    if !granted.contains(required) {
        warn!(%key, %granted, %required, "access denied");
        bail!("you do not have the correct permissions for permission group '{key}'");
    }

    info!(%key, %granted, %required, "access granted");
    Ok(())
}

pub(crate) fn check(
    registry: &PermissionRegistry,
    key: GroupKey,
    required: Permission,
) -> Result<()> {
    authorize(registry, key, required)?;
    println!("access granted: group {key} holds {required}");
    Ok(())
}

/// Renders one `<key>\t<bits>` line per group, in key order.
pub(crate) fn listing(registry: &PermissionRegistry) -> Vec<String> {
    let mut keys: Vec<_> = registry.keys().collect();
    keys.sort_unstable();

    keys.into_iter().map(|key| format!("{key}\t{}", registry.get(key))).collect()
}

pub(crate) fn list(registry: &PermissionRegistry) {
    for line in listing(registry) {
        println!("{line}");
    }
}
