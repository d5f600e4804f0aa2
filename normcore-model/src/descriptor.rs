use crate::SetupContext;
use serde_json::Map;
use std::fmt;

/// Raw payload data flowing through the construction hooks: a plain JSON
/// object, before any relation has been resolved.
pub type RawData = Map<String, serde_json::Value>;

/// Computes the default shape for a new instance.
///
/// Receives the raw input so defaults can branch on it (variant defaults);
/// returns the full default object. `Err(message)` aborts construction.
pub type DefaultsFn = dyn Fn(&RawData) -> Result<RawData, String> + Send + Sync;

/// Post-construction hook, run after defaults merge and before relations
/// resolve.
///
/// Receives the merged data plus read access to the registered models and
/// the record store, and returns the data to continue with. `Err(message)`
/// aborts construction.
pub type SetupFn = dyn Fn(RawData, &SetupContext<'_>) -> Result<RawData, String> + Send + Sync;

/// One declared relation: `field` holds data of the `target` entity type.
///
/// Relations are declared explicitly, never inferred from payload shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Field name on the owning type.
    pub field: String,
    /// Entity type name the field's data belongs to.
    pub target: String,
}

/// Declares an entity type: its name, identifier field, default shape,
/// setup hook, and relations.
///
/// Most declarations need only a name and some relations:
///
/// ```
/// use normcore_model::ModelDescriptor;
///
/// let todo = ModelDescriptor::new("Todo").with_relation("item", "Item");
/// assert_eq!(todo.id_field(), "id");
/// ```
pub struct ModelDescriptor {
    name: String,
    id_field: String,
    defaults: Option<Box<DefaultsFn>>,
    setup: Option<Box<SetupFn>>,
    relations: Vec<Relation>,
}

impl ModelDescriptor {
    /// Creates a descriptor with the default identifier field, `"id"`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: "id".to_string(),
            defaults: None,
            setup: None,
            relations: Vec::new(),
        }
    }

    /// Overrides which field carries the identifier.
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Sets the defaults function.
    #[must_use]
    pub fn with_defaults(
        self,
        defaults: impl Fn(&RawData) -> RawData + Send + Sync + 'static,
    ) -> Self {
        self.with_try_defaults(move |raw| Ok(defaults(raw)))
    }

    /// Sets a defaults function that may reject the input.
    #[must_use]
    pub fn with_try_defaults(
        mut self,
        defaults: impl Fn(&RawData) -> Result<RawData, String> + Send + Sync + 'static,
    ) -> Self {
        self.defaults = Some(Box::new(defaults));
        self
    }

    /// Sets the setup hook.
    #[must_use]
    pub fn with_setup(
        self,
        setup: impl Fn(RawData, &SetupContext<'_>) -> RawData + Send + Sync + 'static,
    ) -> Self {
        self.with_try_setup(move |data, ctx| Ok(setup(data, ctx)))
    }

    /// Sets a setup hook that may reject the data.
    #[must_use]
    pub fn with_try_setup(
        mut self,
        setup: impl Fn(RawData, &SetupContext<'_>) -> Result<RawData, String> + Send + Sync + 'static,
    ) -> Self {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Declares a relation from `field` to the `target` entity type.
    ///
    /// Relations resolve in declaration order during construction.
    #[must_use]
    pub fn with_relation(mut self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.relations.push(Relation {
            field: field.into(),
            target: target.into(),
        });
        self
    }

    /// The entity type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field carrying the identifier.
    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Declared relations, in declaration order.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// The declared relation covering `field`, if any.
    #[must_use]
    pub fn relation_for(&self, field: &str) -> Option<&Relation> {
        self.relations.iter().find(|relation| relation.field == field)
    }

    /// True if a defaults function is declared.
    #[must_use]
    pub fn has_defaults(&self) -> bool {
        self.defaults.is_some()
    }

    /// True if a setup hook is declared.
    #[must_use]
    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    /// Runs the defaults function against `raw`.
    ///
    /// Without a declared function the default shape is empty.
    pub fn default_shape(&self, raw: &RawData) -> Result<RawData, String> {
        match &self.defaults {
            Some(defaults) => defaults(raw),
            None => Ok(RawData::new()),
        }
    }

    /// Runs the setup hook, or passes `data` through unchanged.
    pub fn run_setup(&self, data: RawData, ctx: &SetupContext<'_>) -> Result<RawData, String> {
        match &self.setup {
            Some(setup) => setup(data, ctx),
            None => Ok(data),
        }
    }
}

impl fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("name", &self.name)
            .field("id_field", &self.id_field)
            .field("relations", &self.relations)
            .field("has_defaults", &self.defaults.is_some())
            .field("has_setup", &self.setup.is_some())
            .finish()
    }
}
