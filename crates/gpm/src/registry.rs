use crate::error::{RegistryError, Result};
use crate::key::GroupKey;
use crate::permission::Permission;
use fxhash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, error, trace};

/// Maps each [`GroupKey`] to the [`Permission`] set granted to it.
///
/// The backing map is allocated on the first write. Until then every read
/// answers as if the registry were empty, so a freshly created registry costs
/// nothing until it is used.
///
/// # Characteristics
/// - **Constant time**: `exists`, `get`, `set`, `add` and `allows` are a single
///   hash lookup plus a fixed-width bitwise operation.
/// - **Absent equals empty**: [`get`](Self::get) returns [`Permission::empty`]
///   for unknown keys; only [`exists`](Self::exists) can tell them apart.
/// - **Grant only**: [`add`](Self::add) never revokes. Revoking means calling
///   [`set`](Self::set) with the desired final value.
/// - **Single owner**: there is no internal locking. Wrap the registry in a lock
///   of your choice if it has to be mutated from several threads.
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    groups: Option<FxHashMap<GroupKey, Permission>>,
}

impl PermissionRegistry {
    /// Creates an empty registry without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: None }
    }

    /// Creates an empty registry with room for `capacity` groups.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { groups: Some(FxHashMap::with_capacity_and_hasher(capacity, Default::default())) }
    }

    /// Returns `true` if `key` has an associated permission set, even an empty one.
    #[must_use]
    pub fn exists(&self, key: GroupKey) -> bool {
        self.groups.as_ref().is_some_and(|groups| groups.contains_key(&key))
    }

    /// Returns the permission set of `key`, or the empty set if it has none.
    #[must_use]
    pub fn get(&self, key: GroupKey) -> Permission {
        self.groups.as_ref().and_then(|groups| groups.get(&key).copied()).unwrap_or_default()
    }

    /// Associates `permission` with `key`, replacing any previous value.
    pub fn set(&mut self, key: GroupKey, permission: Permission) {
        let groups = self.groups.get_or_insert_with(|| {
            debug!("Allocating permission registry storage");
            FxHashMap::default()
        });

        trace!(%key, %permission, "Setting group permissions");
        groups.insert(key, permission);
    }

    /// Grants `permission` to `key` on top of whatever it already holds.
    pub fn add(&mut self, key: GroupKey, permission: Permission) {
        self.set(key, self.get(key) | permission);
    }

    /// Returns `true` if `key` holds at least every bit of `required`.
    #[must_use]
    pub fn allows(&self, key: GroupKey, required: Permission) -> bool {
        self.get(key).contains(required)
    }

    /// Number of groups with an associated permission set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.as_ref().map_or(0, FxHashMap::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the backing map has been allocated.
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        self.groups.is_some()
    }

    /// Iterates over all groups in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupKey, Permission)> + '_ {
        self.groups.iter().flat_map(|groups| groups.iter().map(|(key, perm)| (*key, *perm)))
    }

    /// Iterates over all group keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.iter().map(|(key, _)| key)
    }
}

impl PartialEq for PermissionRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, perm)| other.exists(key) && other.get(key) == perm)
    }
}

impl Eq for PermissionRegistry {}

impl<const N: usize> From<[(GroupKey, Permission); N]> for PermissionRegistry {
    fn from(entries: [(GroupKey, Permission); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl FromIterator<(GroupKey, Permission)> for PermissionRegistry {
    fn from_iter<I: IntoIterator<Item = (GroupKey, Permission)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (key, permission) in iter {
            registry.set(key, permission);
        }
        registry
    }
}

impl Extend<(GroupKey, Permission)> for PermissionRegistry {
    fn extend<I: IntoIterator<Item = (GroupKey, Permission)>>(&mut self, iter: I) {
        for (key, permission) in iter {
            self.add(key, permission);
        }
    }
}

impl Serialize for PermissionRegistry {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for PermissionRegistry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let groups = FxHashMap::<GroupKey, Permission>::deserialize(deserializer)?;
        Ok(groups.into_iter().collect())
    }
}

/// Read access to something that may or may not denote a registry.
///
/// Reads never fail: a handle without a registry behind it answers `false`
/// and [`Permission::empty`].
pub trait PermissionLookup {
    fn exists(&self, key: GroupKey) -> bool;

    fn get(&self, key: GroupKey) -> Permission;

    /// Returns `true` if `key` holds at least every bit of `required`.
    fn allows(&self, key: GroupKey, required: Permission) -> bool {
        self.get(key).contains(required)
    }
}

/// Write access to something that may or may not denote a registry.
///
/// Granting through a handle that denotes no registry (as opposed to an empty
/// one) is a caller bug. [`try_set`](Self::try_set) reports it as
/// [`RegistryError::Detached`]; [`set`](Self::set) and [`add`](Self::add) panic.
pub trait PermissionGrant: PermissionLookup {
    /// Associates `permission` with `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`RegistryError::Detached`] if the handle denotes no registry.
    fn try_set(&mut self, key: GroupKey, permission: Permission) -> Result<()>;

    /// Grants `permission` to `key` on top of whatever it already holds.
    ///
    /// # Errors
    /// Returns [`RegistryError::Detached`] if the handle denotes no registry.
    fn try_add(&mut self, key: GroupKey, permission: Permission) -> Result<()> {
        let merged = self.get(key) | permission;
        self.try_set(key, merged)
    }

    /// # Panics
    /// Panics if the handle denotes no registry.
    #[track_caller]
    fn set(&mut self, key: GroupKey, permission: Permission) {
        if let Err(e) = self.try_set(key, permission) {
            panic!("{e}");
        }
    }

    /// # Panics
    /// Panics if the handle denotes no registry.
    #[track_caller]
    fn add(&mut self, key: GroupKey, permission: Permission) {
        if let Err(e) = self.try_add(key, permission) {
            panic!("{e}");
        }
    }
}

impl PermissionLookup for PermissionRegistry {
    fn exists(&self, key: GroupKey) -> bool {
        Self::exists(self, key)
    }

    fn get(&self, key: GroupKey) -> Permission {
        Self::get(self, key)
    }
}

impl PermissionGrant for PermissionRegistry {
    fn try_set(&mut self, key: GroupKey, permission: Permission) -> Result<()> {
        Self::set(self, key, permission);
        Ok(())
    }
}

impl<R: PermissionLookup + ?Sized> PermissionLookup for &R {
    fn exists(&self, key: GroupKey) -> bool {
        (**self).exists(key)
    }

    fn get(&self, key: GroupKey) -> Permission {
        (**self).get(key)
    }
}

impl<R: PermissionLookup + ?Sized> PermissionLookup for &mut R {
    fn exists(&self, key: GroupKey) -> bool {
        (**self).exists(key)
    }

    fn get(&self, key: GroupKey) -> Permission {
        (**self).get(key)
    }
}

impl<R: PermissionGrant + ?Sized> PermissionGrant for &mut R {
    fn try_set(&mut self, key: GroupKey, permission: Permission) -> Result<()> {
        (**self).try_set(key, permission)
    }
}

impl<R: PermissionLookup> PermissionLookup for Option<R> {
    fn exists(&self, key: GroupKey) -> bool {
        self.as_ref().is_some_and(|registry| registry.exists(key))
    }

    fn get(&self, key: GroupKey) -> Permission {
        self.as_ref().map_or_else(Permission::empty, |registry| registry.get(key))
    }
}

impl<R: PermissionGrant> PermissionGrant for Option<R> {
    fn try_set(&mut self, key: GroupKey, permission: Permission) -> Result<()> {
        let Some(registry) = self.as_mut() else {
            error!(%key, %permission, "Grant attempted through a detached registry handle");
            return Err(RegistryError::Detached { key, context: None });
        };
        registry.try_set(key, permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: u16) -> GroupKey {
        GroupKey::new(value)
    }

    #[test]
    fn new_registry_is_unallocated_and_answers_reads() {
        let registry = PermissionRegistry::new();

        assert!(!registry.is_allocated());
        assert!(!registry.exists(key(0)));
        assert_eq!(registry.get(key(0)), Permission::empty());
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn first_write_allocates() {
        let mut registry = PermissionRegistry::new();
        registry.set(key(0), Permission::from(0b101));

        assert!(registry.is_allocated());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(key(0)), Permission::from(0b101));
    }

    #[test]
    fn explicit_zero_exists_but_reads_like_absent() {
        let mut registry = PermissionRegistry::new();
        registry.set(key(4), Permission::empty());

        assert!(registry.exists(key(4)));
        assert_eq!(registry.get(key(4)), registry.get(key(5)));
    }

    #[test]
    fn set_overwrites_and_add_merges() {
        let mut registry = PermissionRegistry::new();
        registry.set(key(1), Permission::from(0b011));
        registry.add(key(1), Permission::from(0b110));
        assert_eq!(registry.get(key(1)), Permission::from(0b111));

        registry.set(key(1), Permission::from(0b001));
        assert_eq!(registry.get(key(1)), Permission::from(0b001));
    }

    #[test]
    fn add_on_absent_key_creates_it() {
        let mut registry = PermissionRegistry::new();
        registry.add(key(9), Permission::from(0b10));

        assert!(registry.exists(key(9)));
        assert_eq!(registry.get(key(9)), Permission::from(0b10));
    }

    #[test]
    fn literal_population_and_lookup() {
        let registry = PermissionRegistry::from([
            (key(0), Permission::from(0b100)),
            (key(1), Permission::from(0b001)),
        ]);

        assert_eq!(registry.get(key(0)), Permission::from(0b100));
        assert_eq!(registry.get(key(99)), Permission::empty());
        assert!(registry.allows(key(1), Permission::from(0b001)));
        assert!(!registry.allows(key(1), Permission::from(0b011)));
    }

    #[test]
    fn collect_keeps_last_write_while_extend_merges() {
        let collected: PermissionRegistry =
            [(key(0), Permission::from(0b01)), (key(0), Permission::from(0b10))]
                .into_iter()
                .collect();
        assert_eq!(collected.get(key(0)), Permission::from(0b10));

        let mut extended = PermissionRegistry::new();
        extended.extend([(key(0), Permission::from(0b01)), (key(0), Permission::from(0b10))]);
        assert_eq!(extended.get(key(0)), Permission::from(0b11));
    }

    #[test]
    fn unallocated_equals_allocated_empty() {
        assert_eq!(PermissionRegistry::new(), PermissionRegistry::with_capacity(8));

        let mut a = PermissionRegistry::new();
        a.set(key(0), Permission::empty());
        assert_ne!(a, PermissionRegistry::new());
    }

    #[test]
    fn detached_handle_reads_gracefully() {
        let handle: Option<&mut PermissionRegistry> = None;

        assert!(!handle.exists(key(0)));
        assert_eq!(handle.get(key(0)), Permission::empty());
        assert!(!handle.allows(key(0), Permission::from(1)));
    }

    #[test]
    fn detached_handle_rejects_fallible_writes() {
        let mut handle: Option<&mut PermissionRegistry> = None;

        let err = handle.try_set(key(3), Permission::from(1)).unwrap_err();
        assert!(matches!(err, RegistryError::Detached { key: k, .. } if k == key(3)));
        assert!(handle.try_add(key(3), Permission::from(1)).is_err());
    }

    #[test]
    #[should_panic(expected = "Detached registry handle")]
    fn detached_handle_panics_on_set() {
        let mut handle: Option<&mut PermissionRegistry> = None;
        PermissionGrant::set(&mut handle, key(0), Permission::from(0b101));
    }

    #[test]
    #[should_panic(expected = "Detached registry handle")]
    fn detached_handle_panics_on_add() {
        let mut handle: Option<PermissionRegistry> = None;
        handle.add(key(0), Permission::from(0b101));
    }

    #[test]
    fn attached_handle_writes_through() {
        let mut registry = PermissionRegistry::new();
        {
            let mut handle = Some(&mut registry);
            handle.set(key(2), Permission::from(0b001));
            handle.add(key(2), Permission::from(0b100));
            assert!(handle.exists(key(2)));
        }

        assert_eq!(registry.get(key(2)), Permission::from(0b101));
    }
}
