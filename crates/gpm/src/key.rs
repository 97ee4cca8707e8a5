use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a group of related permissions (e.g. "write", "read").
///
/// Values are chosen by the caller, usually as small sequential constants
/// generated with [`crate::group_keys!`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupKey(u16);

impl GroupKey {
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw key value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<u16> for GroupKey {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<GroupKey> for u16 {
    fn from(key: GroupKey) -> Self {
        key.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupKey {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed.parse::<u16>().map(Self).map_err(|e| RegistryError::Parse {
            message: format!("'{trimmed}' is not a group key: {e}").into(),
            context: None,
        })
    }
}
