use indexmap::IndexMap;
use normcore_types::{IdKey, InstanceId};

/// Insertion-ordered identity registry for a single entity type.
///
/// Maps each identifier to the canonical instance handle for that entity.
/// At most one handle per key; re-inserting an existing key replaces the
/// handle but keeps the key's original position, so iteration order is
/// first-commit order.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    entries: IndexMap<IdKey, InstanceId>,
}

impl IdentityMap {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the canonical instance for `key`.
    #[must_use]
    pub fn get(&self, key: &IdKey) -> Option<InstanceId> {
        self.entries.get(key).copied()
    }

    /// Registers `uid` as canonical for `key`, returning the previous handle.
    pub fn insert(&mut self, key: IdKey, uid: InstanceId) -> Option<InstanceId> {
        self.entries.insert(key, uid)
    }

    /// Unregisters `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &IdKey) -> Option<InstanceId> {
        self.entries.shift_remove(key)
    }

    /// True if `key` has a canonical instance.
    #[must_use]
    pub fn contains_key(&self, key: &IdKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no identities are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in first-commit order.
    pub fn keys(&self) -> impl Iterator<Item = &IdKey> {
        self.entries.keys()
    }

    /// (key, handle) pairs in first-commit order.
    pub fn iter(&self) -> impl Iterator<Item = (&IdKey, InstanceId)> {
        self.entries.iter().map(|(key, uid)| (key, *uid))
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
