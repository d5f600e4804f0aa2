use crate::ModelRegistry;
use normcore_store::{Instance, RecordStore};
use normcore_types::IdKey;

/// Read-only view handed to setup hooks: the registered models and the
/// record store as they stand mid-construction.
///
/// Hooks use this to reach sibling declarations or already-committed
/// instances; they never mutate through it.
#[derive(Debug, Clone, Copy)]
pub struct SetupContext<'a> {
    /// The model registry the instance under construction belongs to.
    pub models: &'a ModelRegistry,
    /// The record store, including instances committed earlier in the same
    /// construction call.
    pub records: &'a RecordStore,
}

impl SetupContext<'_> {
    /// Canonical instance for (`model`, `key`), if committed.
    #[must_use]
    pub fn get(&self, model: &str, key: impl Into<IdKey>) -> Option<&Instance> {
        self.records.get_keyed(model, &key.into())
    }

    /// True if `name` is a registered entity type.
    #[must_use]
    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains(name)
    }
}
