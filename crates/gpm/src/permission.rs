use crate::error::{RegistryError, Result};
use bitflags::{Flags, bitflags};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// A bitmask where each bit is one atomic capability.
    ///
    /// Bit meanings are assigned by the caller, so every one of the 64 bits is
    /// retained as-is. A group needing more than 64 capabilities has to be split
    /// across several [`crate::GroupKey`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Permission: u64 {
        const _ = !0;
    }
}

impl Permission {
    /// The single-bit permission `1 << shift`.
    ///
    /// # Panics
    /// Panics if `shift` is 64 or more. In a `const` this is a compile error.
    #[must_use]
    pub const fn bit(shift: u32) -> Self {
        match Self::try_bit(shift) {
            Some(permission) => permission,
            None => panic!("permission bit out of range: a permission set holds 64 bits"),
        }
    }

    /// The single-bit permission `1 << shift`, or `None` if it does not fit.
    #[must_use]
    pub const fn try_bit(shift: u32) -> Option<Self> {
        match 1u64.checked_shl(shift) {
            Some(bits) => Some(Self::from_bits_retain(bits)),
            None => None,
        }
    }

    /// Converts any caller-defined `bitflags` type backed by `u64`.
    #[must_use]
    pub fn from_flags<F: Flags<Bits = u64>>(flags: F) -> Self {
        Self::from_bits_retain(flags.bits())
    }

    /// Parses a permission literal such as `5`, `0b101`, `0x5` or `0b001 | 0x4`.
    ///
    /// Every `|`-separated term is an unsigned integer in decimal or with a
    /// `0b`, `0o` or `0x` prefix. Underscores are ignored.
    ///
    /// # Errors
    /// Returns [`RegistryError::Parse`] if any term is empty or not a valid `u64`.
    pub fn parse(input: &str) -> Result<Self> {
        input.split('|').try_fold(Self::empty(), |acc, term| {
            let cleaned = term.trim().replace('_', "").to_ascii_lowercase();
            let (digits, radix) = split_radix(&cleaned);
            u64::from_str_radix(digits, radix)
                .map(|bits| acc | Self::from_bits_retain(bits))
                .map_err(|e| RegistryError::Parse {
                    message: format!("'{}' is not a permission literal: {e}", term.trim()).into(),
                    context: None,
                })
        })
    }
}

fn split_radix(term: &str) -> (&str, u32) {
    [("0b", 2), ("0o", 8), ("0x", 16)]
        .into_iter()
        .find_map(|(prefix, radix)| term.strip_prefix(prefix).map(|rest| (rest, radix)))
        .unwrap_or((term, 10))
}

impl Default for Permission {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<u64> for Permission {
    fn from(bits: u64) -> Self {
        Self::from_bits_retain(bits)
    }
}

impl From<Permission> for u64 {
    fn from(permission: Permission) -> Self {
        permission.bits()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.bits())
    }
}

impl Serialize for Permission {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}
