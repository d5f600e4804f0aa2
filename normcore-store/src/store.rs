use crate::{IdentityMap, Instance};
use normcore_types::{IdKey, InstanceId};
use std::collections::HashMap;

/// Owns every constructed instance and the per-type identity registries
/// that key the committed ones.
///
/// Two layers:
/// - the instance table, handle → instance, holding everything ever
///   constructed (committed or detached);
/// - one [`IdentityMap`] per entity type, identifier → canonical handle.
///
/// Detached instances (no usable identifier, or uncommitted copies) live in
/// the instance table but are invisible to keyed lookup and iteration.
#[derive(Debug, Default)]
pub struct RecordStore {
    instances: HashMap<InstanceId, Instance>,
    keyed: HashMap<String, IdentityMap>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Instance table ────────────────────────────────────────────

    /// Inserts an instance without registering an identity.
    ///
    /// The instance is reachable by handle only.
    pub fn insert_detached(&mut self, instance: Instance) -> InstanceId {
        let uid = instance.uid();
        self.instances.insert(uid, instance);
        uid
    }

    /// Reads an instance by handle.
    #[must_use]
    pub fn get(&self, uid: InstanceId) -> Option<&Instance> {
        self.instances.get(&uid)
    }

    /// Mutable access to an instance by handle.
    pub fn get_mut(&mut self, uid: InstanceId) -> Option<&mut Instance> {
        self.instances.get_mut(&uid)
    }

    /// True if the store holds an instance for `uid`.
    #[must_use]
    pub fn contains(&self, uid: InstanceId) -> bool {
        self.instances.contains_key(&uid)
    }

    // ── Identity registration ─────────────────────────────────────

    /// Inserts `instance` and registers it as canonical for `key` under its
    /// model.
    ///
    /// If the key was already registered the previous canonical instance is
    /// dropped from the table. The construction pipeline never takes that
    /// path (it merges into the existing instance instead); this is the
    /// behavior for direct store use.
    pub fn put(&mut self, key: IdKey, instance: Instance) -> InstanceId {
        let uid = self.insert_detached(instance);
        if let Some(prev) = self.bind(key, uid) {
            if prev != uid {
                self.instances.remove(&prev);
            }
        }
        uid
    }

    /// Registers an already-inserted instance as canonical for `key` under
    /// its own model, returning the previously registered handle if any.
    ///
    /// Also records the key on the instance itself, so removal can find the
    /// registration again. An instance answers for one key at a time: if it
    /// was registered under a different key, that registration moves rather
    /// than lingering. Returns `None` without registering anything when
    /// `uid` is not in the table.
    pub fn bind(&mut self, key: IdKey, uid: InstanceId) -> Option<InstanceId> {
        let Some(instance) = self.instances.get_mut(&uid) else {
            return None;
        };
        let model = instance.model().to_string();
        let previous = instance.key().filter(|prev| **prev != key).cloned();
        instance.rekey(Some(key.clone()));
        let map = self.keyed.entry(model).or_default();
        if let Some(prev) = previous {
            // only this instance's own registration moves; a copy carrying
            // the canonical's key does not own that entry
            if map.get(&prev) == Some(uid) {
                map.remove(&prev);
            }
        }
        map.insert(key, uid)
    }

    // ── Keyed lookup ──────────────────────────────────────────────

    /// Handle of the canonical instance for (`model`, `key`).
    #[must_use]
    pub fn lookup(&self, model: &str, key: &IdKey) -> Option<InstanceId> {
        self.keyed.get(model).and_then(|map| map.get(key))
    }

    /// Canonical instance for (`model`, `key`).
    #[must_use]
    pub fn get_keyed(&self, model: &str, key: &IdKey) -> Option<&Instance> {
        self.lookup(model, key).and_then(|uid| self.instances.get(&uid))
    }

    /// Mutable access to the canonical instance for (`model`, `key`).
    pub fn get_keyed_mut(&mut self, model: &str, key: &IdKey) -> Option<&mut Instance> {
        let uid = self.lookup(model, key)?;
        self.instances.get_mut(&uid)
    }

    // ── Removal ───────────────────────────────────────────────────

    /// Removes an instance by handle, returning it.
    ///
    /// If the instance is the canonical one for its key, the identity is
    /// unregistered too. References other instances hold to this handle are
    /// left in place and simply stop resolving.
    pub fn remove(&mut self, uid: InstanceId) -> Option<Instance> {
        let instance = self.instances.remove(&uid)?;
        if let Some(key) = instance.key() {
            if let Some(map) = self.keyed.get_mut(instance.model()) {
                if map.get(key) == Some(uid) {
                    map.remove(key);
                }
            }
        }
        Some(instance)
    }

    /// Removes the canonical instance for (`model`, `key`), returning it.
    pub fn remove_keyed(&mut self, model: &str, key: &IdKey) -> Option<Instance> {
        let uid = self.lookup(model, key)?;
        self.remove(uid)
    }

    /// Drops every instance and every identity registration.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.keyed.clear();
    }

    // ── Iteration and counts ──────────────────────────────────────

    /// Committed instances of `model` in first-commit order.
    #[must_use]
    pub fn instances_of(&self, model: &str) -> Vec<&Instance> {
        self.keyed.get(model).map_or_else(Vec::new, |map| {
            map.iter()
                .filter_map(|(_, uid)| self.instances.get(&uid))
                .collect()
        })
    }

    /// Identity keys of `model` in first-commit order.
    #[must_use]
    pub fn keys_of(&self, model: &str) -> Vec<IdKey> {
        self.keyed
            .get(model)
            .map_or_else(Vec::new, |map| map.keys().cloned().collect())
    }

    /// Canonical handles of `model` in first-commit order.
    #[must_use]
    pub fn handles_of(&self, model: &str) -> Vec<InstanceId> {
        self.keyed
            .get(model)
            .map_or_else(Vec::new, |map| map.iter().map(|(_, uid)| uid).collect())
    }

    /// Number of committed instances of `model`.
    #[must_use]
    pub fn count(&self, model: &str) -> usize {
        self.keyed.get(model).map_or(0, IdentityMap::len)
    }

    /// Entity types with at least one identity registered, sorted by name.
    #[must_use]
    pub fn models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .keyed
            .iter()
            .filter(|(_, map)| !map.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Total number of instances held, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when the store holds no instances at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
