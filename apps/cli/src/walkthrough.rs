//! The adoption steps end to end: define keys, define bits, populate, check.

use crate::commands::authorize;
use anyhow::Result;
use gpm::prelude::*;

gpm::group_keys!(pub(crate) WRITE_KEY, READ_KEY);

gpm::permissions!(pub(crate) WRITE_NAME, WRITE_LAST_NAME);

gpm::permissions!(pub(crate) READ_NAME, READ_LAST_NAME);

/// Stands in for loading the current user's permissions.
pub(crate) fn user_permissions() -> PermissionRegistry {
    PermissionRegistry::from([
        (WRITE_KEY, WRITE_NAME),
        // Always combine permissions with `|`
        (READ_KEY, READ_NAME | READ_LAST_NAME),
    ])
}

/// Fails on the first protected action the user is not allowed to perform.
pub(crate) fn run() -> Result<()> {
    let registry = user_permissions();

    authorize(&registry, WRITE_KEY, WRITE_NAME | WRITE_LAST_NAME)?;
    authorize(&registry, READ_KEY, READ_NAME)?;

    println!("all protected actions allowed");
    Ok(())
}
