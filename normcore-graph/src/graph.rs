use crate::{GraphError, GraphResult};
use normcore_model::{ModelDescriptor, ModelRegistry};
use normcore_store::{Instance, RecordStore};
use normcore_types::{FieldValue, IdKey, InstanceId};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The normalization engine: an alias-scoped model registry plus the record
/// store its instances live in.
///
/// [`create`](Self::create) is the write path. It runs the construction
/// pipeline over a JSON payload (defaults, setup hook, relation resolution,
/// identity-map commit) and returns the handle of the resulting canonical
/// instance. Everything else is lookup, mutation through handles, and
/// lifecycle plumbing.
///
/// ```
/// use normcore_graph::{EntityGraph, ModelDescriptor};
/// use serde_json::json;
///
/// let mut graph = EntityGraph::new("myApi");
/// graph.register(ModelDescriptor::new("Item"));
/// graph.register(ModelDescriptor::new("Todo").with_relation("item", "Item"));
///
/// let todo = graph
///     .create("Todo", json!({"id": 1, "item": {"id": 7, "test": true}}))
///     .unwrap();
/// let item = graph.related(todo, "item").unwrap();
/// assert_eq!(item.get_bool("test"), Some(true));
/// ```
pub struct EntityGraph {
    pub(crate) models: ModelRegistry,
    pub(crate) records: RecordStore,
}

impl EntityGraph {
    /// Creates an empty graph scoped to `alias`.
    #[must_use]
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            models: ModelRegistry::new(alias),
            records: RecordStore::new(),
        }
    }

    /// Builds a graph over an already-populated registry.
    #[must_use]
    pub fn with_registry(models: ModelRegistry) -> Self {
        Self {
            models,
            records: RecordStore::new(),
        }
    }

    /// The alias this graph's registry is scoped to.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.models.alias()
    }

    // ── Declarations ──────────────────────────────────────────────

    /// Registers an entity type declaration.
    pub fn register(&mut self, descriptor: ModelDescriptor) -> Arc<ModelDescriptor> {
        debug!(
            "Registering model {} in graph `{}`",
            descriptor.name(),
            self.alias()
        );
        self.models.register(descriptor)
    }

    /// The registered declarations.
    #[must_use]
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Mutable access to the declarations, for re-registration or teardown.
    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    /// Read access to the record store.
    #[must_use]
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    // ── Construction ──────────────────────────────────────────────

    /// Constructs instances from `payload` for the `model` type and returns
    /// the handle of the top-level instance.
    ///
    /// Related payload objects are constructed depth-first through their own
    /// declarations, each relation slot ends up holding handles, and any
    /// identifier the store already tracks merges into its canonical
    /// instance instead of creating a second one. A payload without a usable
    /// identifier still constructs, but stays detached from keyed lookup.
    pub fn create(&mut self, model: &str, payload: Value) -> GraphResult<InstanceId> {
        let descriptor = self
            .models
            .get(model)
            .ok_or_else(|| GraphError::UnknownModel(model.to_string()))?;
        self.build_instance(&descriptor, payload)
    }

    // ── Lookup ────────────────────────────────────────────────────

    /// Reads an instance by handle.
    #[must_use]
    pub fn instance(&self, uid: InstanceId) -> Option<&Instance> {
        self.records.get(uid)
    }

    /// Mutable access to an instance by handle.
    pub fn instance_mut(&mut self, uid: InstanceId) -> Option<&mut Instance> {
        self.records.get_mut(uid)
    }

    /// True if the graph holds an instance for `uid`.
    #[must_use]
    pub fn contains(&self, uid: InstanceId) -> bool {
        self.records.contains(uid)
    }

    /// Canonical instance for (`model`, `key`).
    #[must_use]
    pub fn get(&self, model: &str, key: impl Into<IdKey>) -> Option<&Instance> {
        self.records.get_keyed(model, &key.into())
    }

    /// Handle of the canonical instance for (`model`, `key`).
    #[must_use]
    pub fn get_id(&self, model: &str, key: impl Into<IdKey>) -> Option<InstanceId> {
        self.records.lookup(model, &key.into())
    }

    /// Follows the reference held by `field` on the instance behind `uid`.
    ///
    /// `None` when the instance or field is missing, the field holds
    /// something other than a single reference, or the reference dangles.
    #[must_use]
    pub fn related(&self, uid: InstanceId, field: &str) -> Option<&Instance> {
        let target = self.records.get(uid)?.get_ref(field)?;
        self.records.get(target)
    }

    /// Committed instances of `model` in first-commit order.
    #[must_use]
    pub fn instances_of(&self, model: &str) -> Vec<&Instance> {
        self.records.instances_of(model)
    }

    /// Identity keys of `model` in first-commit order.
    #[must_use]
    pub fn keys_of(&self, model: &str) -> Vec<IdKey> {
        self.records.keys_of(model)
    }

    /// Canonical handles of `model` in first-commit order.
    #[must_use]
    pub fn handles_of(&self, model: &str) -> Vec<InstanceId> {
        self.records.handles_of(model)
    }

    /// Number of committed instances of `model`.
    #[must_use]
    pub fn count(&self, model: &str) -> usize {
        self.records.count(model)
    }

    /// Total number of instances held, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the graph holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────

    /// Mutates the instance behind `uid` in place.
    ///
    /// The mutation is immediately visible to every holder of the handle;
    /// there are no per-holder copies to update.
    pub fn update<F>(&mut self, uid: InstanceId, mutate: F) -> GraphResult<()>
    where
        F: FnOnce(&mut Instance),
    {
        let instance = self
            .records
            .get_mut(uid)
            .ok_or(GraphError::UnknownInstance(uid))?;
        mutate(instance);
        Ok(())
    }

    // ── Copies ────────────────────────────────────────────────────

    /// Creates a detached copy of the instance behind `uid`.
    ///
    /// The copy gets its own handle and is invisible to keyed lookup until
    /// [`commit_instance`](Self::commit_instance) folds it back in.
    pub fn clone_instance(&mut self, uid: InstanceId) -> GraphResult<InstanceId> {
        let copy = self
            .records
            .get(uid)
            .ok_or(GraphError::UnknownInstance(uid))?
            .detached_copy();
        let copy_uid = self.records.insert_detached(copy);
        debug!("Cloned instance {} as detached copy {}", uid, copy_uid);
        Ok(copy_uid)
    }

    /// Commits a detached instance under its current identifier field.
    ///
    /// If the identifier is already tracked, the copy's fields merge into
    /// the canonical instance, the copy is dropped, and the canonical handle
    /// comes back. Otherwise the instance itself is promoted to canonical
    /// and keeps its handle. Committing an instance that is already
    /// canonical is a no-op.
    pub fn commit_instance(&mut self, uid: InstanceId) -> GraphResult<InstanceId> {
        let (model, fields) = {
            let instance = self
                .records
                .get(uid)
                .ok_or(GraphError::UnknownInstance(uid))?;
            (instance.model().to_string(), instance.fields_cloned())
        };
        let descriptor = self
            .models
            .get(&model)
            .ok_or_else(|| GraphError::UnknownModel(model.clone()))?;
        let key = fields
            .get(descriptor.id_field())
            .and_then(FieldValue::to_id_key)
            .ok_or_else(|| GraphError::MissingIdentifier {
                model: model.clone(),
                uid,
            })?;

        match self.records.lookup(&model, &key) {
            Some(canonical) if canonical == uid => Ok(uid),
            Some(canonical) => {
                if let Some(instance) = self.records.get_mut(canonical) {
                    instance.merge_fields(fields);
                }
                self.records.remove(uid);
                debug!(
                    "Committed copy {} into canonical {} for {} `{}`",
                    uid, canonical, model, key
                );
                Ok(canonical)
            }
            None => {
                self.records.bind(key.clone(), uid);
                debug!("Promoted {} to canonical for {} `{}`", uid, model, key);
                Ok(uid)
            }
        }
    }

    // ── Removal ───────────────────────────────────────────────────

    /// Removes an instance by handle, returning it.
    ///
    /// Its identity registration goes with it; references held elsewhere
    /// stay in place and stop resolving.
    pub fn remove(&mut self, uid: InstanceId) -> Option<Instance> {
        let removed = self.records.remove(uid);
        if removed.is_some() {
            debug!("Removed instance {}", uid);
        }
        removed
    }

    /// Removes the canonical instance for (`model`, `key`), returning it.
    pub fn remove_by_key(&mut self, model: &str, key: impl Into<IdKey>) -> Option<Instance> {
        self.records.remove_keyed(model, &key.into())
    }

    /// Drops every instance and identity registration.
    ///
    /// Model declarations survive; use [`models_mut`](Self::models_mut) to
    /// tear those down as well.
    pub fn clear(&mut self) {
        debug!("Clearing all instances from graph `{}`", self.alias());
        self.records.clear();
    }
}
