use crate::key::GroupKey;
use std::borrow::Cow;

/// Errors raised by the registry and its helpers.
///
/// A denied capability check is not an error: [`crate::Permission::contains`]
/// simply answers `false` and the caller decides what to do with it.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A grant was attempted through a handle that denotes no registry at all.
    #[error(
        "Detached registry handle{}: cannot grant permissions to group {key}",
        format_context(.context)
    )]
    Detached { key: GroupKey, context: Option<Cow<'static, str>> },

    /// A key or permission literal could not be parsed.
    #[error("Invalid literal{}: {message}", format_context(.context))]
    Parse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A bit position does not fit into a [`crate::Permission`].
    #[error("Bit {bit} is out of range{}: permission sets hold 64 bits", format_context(.context))]
    InvalidBit { bit: u32, context: Option<Cow<'static, str>> },

    /// Loading a registry seed from configuration failed.
    #[cfg(feature = "config")]
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Attaches a human-readable context to a failed result.
pub trait RegistryErrorExt<T> {
    /// Sets the context of the contained error, converting it first if needed.
    ///
    /// # Errors
    /// Returns the original error, now carrying `context`.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> RegistryErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                RegistryError::Detached { context: c, .. }
                | RegistryError::Parse { context: c, .. }
                | RegistryError::InvalidBit { context: c, .. } => *c = Some(context.into()),
                #[cfg(feature = "config")]
                RegistryError::Config { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

#[cfg(feature = "config")]
impl From<config::ConfigError> for RegistryError {
    #[inline]
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

#[cfg(feature = "config")]
impl<T> RegistryErrorExt<T> for std::result::Result<T, config::ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| RegistryError::Config { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
