use crate::ModelDescriptor;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::warn;

/// Alias-scoped registry of entity type declarations.
///
/// One registry per store alias; independent registries never see each
/// other's declarations, so two engines can declare a `Todo` each without
/// colliding. Declarations persist until [`clear`](Self::clear).
///
/// Descriptors are handed out as `Arc` so the construction pipeline can
/// hold one while the registry (and the store next to it) is borrowed
/// elsewhere.
#[derive(Debug)]
pub struct ModelRegistry {
    alias: String,
    models: IndexMap<String, Arc<ModelDescriptor>>,
}

impl ModelRegistry {
    /// Creates an empty registry scoped to `alias`.
    #[must_use]
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            models: IndexMap::new(),
        }
    }

    /// The store alias this registry is scoped to.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Registers a descriptor under its declared name.
    ///
    /// Re-declaring a name replaces the previous descriptor; instances
    /// already constructed from it are unaffected.
    pub fn register(&mut self, descriptor: ModelDescriptor) -> Arc<ModelDescriptor> {
        let name = descriptor.name().to_string();
        let descriptor = Arc::new(descriptor);
        if self
            .models
            .insert(name.clone(), Arc::clone(&descriptor))
            .is_some()
        {
            warn!(
                "replacing model declaration `{}` in registry `{}`",
                name, self.alias
            );
        }
        descriptor
    }

    /// The descriptor declared under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ModelDescriptor>> {
        self.models.get(name).cloned()
    }

    /// True if `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Declared type names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drops every declaration, returning the registry to its initial state.
    pub fn clear(&mut self) {
        self.models.clear();
    }
}
