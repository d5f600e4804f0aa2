use normcore_types::{FieldValue, IdKey, InstanceId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One constructed instance in the record store.
///
/// The store is the sole owner of instances; relation fields and callers
/// hold the instance's [`InstanceId`] instead. Field names are kept sorted
/// so iteration and export are deterministic.
///
/// The model name is fixed at construction; the identity key is managed by
/// the store so it always agrees with the identity maps. Field mutation goes
/// through [`set`](Self::set) and [`unset`](Self::unset).
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    uid: InstanceId,
    model: String,
    key: Option<IdKey>,
    fields: BTreeMap<String, FieldValue>,
}

impl Instance {
    /// Creates an instance of `model` with a fresh handle.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        key: Option<IdKey>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Self {
        Self {
            uid: InstanceId::new(),
            model: model.into(),
            key,
            fields,
        }
    }

    /// Creates a detached copy: same model, key, and fields, fresh handle.
    ///
    /// The copy shares nothing with the original and is not registered
    /// anywhere until committed.
    #[must_use]
    pub fn detached_copy(&self) -> Self {
        Self {
            uid: InstanceId::new(),
            model: self.model.clone(),
            key: self.key.clone(),
            fields: self.fields.clone(),
        }
    }

    /// The stable handle for this instance.
    #[must_use]
    pub fn uid(&self) -> InstanceId {
        self.uid
    }

    /// The entity type this instance belongs to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The identity key this instance is registered under, if any.
    #[must_use]
    pub fn key(&self) -> Option<&IdKey> {
        self.key.as_ref()
    }

    // Kept in agreement with the identity maps by `RecordStore::bind`.
    pub(crate) fn rekey(&mut self, key: Option<IdKey>) {
        self.key = key;
    }

    /// Reads one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Extract a string field.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_str)
    }

    /// Extract a boolean field.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(FieldValue::as_bool)
    }

    /// Extract an integral numeric field.
    #[must_use]
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(FieldValue::as_i64)
    }

    /// Extract a numeric field.
    #[must_use]
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(FieldValue::as_f64)
    }

    /// Extract the handle held by a relation field.
    #[must_use]
    pub fn get_ref(&self, field: &str) -> Option<InstanceId> {
        self.fields.get(field).and_then(FieldValue::as_ref_id)
    }

    /// Sets one field, returning the previous value if any.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Removes one field, returning its value if it was present.
    pub fn unset(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// True if the field is present (even when null).
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Overwrites fields from `incoming`, field by field, keeping fields the
    /// incoming data does not mention.
    ///
    /// This is the in-place merge that runs when a payload arrives for an
    /// identifier the store already tracks: the instance (and its handle)
    /// survives, only its data updates.
    pub fn merge_fields(&mut self, incoming: BTreeMap<String, FieldValue>) {
        for (field, value) in incoming {
            self.fields.insert(field, value);
        }
    }

    /// Clones the field table, for committing a copy elsewhere.
    #[must_use]
    pub fn fields_cloned(&self) -> BTreeMap<String, FieldValue> {
        self.fields.clone()
    }

    /// Exports the instance data as a JSON object, references rendered as
    /// `{"$ref": "<uuid>"}` markers.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let entries: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Value::Object(entries)
    }
}
