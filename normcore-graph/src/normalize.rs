//! The construction pipeline: defaults, setup hook, relation resolution,
//! identity-map commit.
//!
//! Construction is depth-first: related payload objects become instances
//! before their owner commits, so by the time an instance lands in the
//! store every relation slot already holds handles. Cycles terminate
//! because an identifier commits the first time it is seen; when the same
//! identifier comes around again deeper in the payload, that appearance
//! merges into the already-committed instance instead of recursing.

use crate::defaults::apply_defaults;
use crate::{EntityGraph, GraphError, GraphResult};
use normcore_model::{ModelDescriptor, RawData, SetupContext};
use normcore_store::Instance;
use normcore_types::{FieldValue, InstanceId};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

impl EntityGraph {
    /// Runs the full pipeline for one payload of the given model.
    pub(crate) fn build_instance(
        &mut self,
        model: &Arc<ModelDescriptor>,
        payload: Value,
    ) -> GraphResult<InstanceId> {
        let raw = match payload {
            Value::Object(fields) => fields,
            Value::Null => RawData::new(),
            other => {
                return Err(GraphError::InvalidPayload {
                    model: model.name().to_string(),
                    found: json_type_name(&other),
                });
            }
        };

        let data = apply_defaults(model, raw)?;
        let data = {
            let ctx = SetupContext {
                models: &self.models,
                records: &self.records,
            };
            model
                .run_setup(data, &ctx)
                .map_err(|message| GraphError::Setup {
                    model: model.name().to_string(),
                    message,
                })?
        };
        let fields = self.resolve_relations(model, data)?;
        Ok(self.commit_fields(model, fields))
    }

    /// Walks the declared relations in declaration order, replacing related
    /// payloads with handles; everything undeclared converts as plain data.
    fn resolve_relations(
        &mut self,
        model: &Arc<ModelDescriptor>,
        mut data: RawData,
    ) -> GraphResult<BTreeMap<String, FieldValue>> {
        let mut fields = BTreeMap::new();
        for relation in model.relations() {
            // an absent slot stays absent; null is kept as an explicit "no
            // related entity"
            let Some(value) = data.remove(&relation.field) else {
                continue;
            };
            if value.is_null() {
                fields.insert(relation.field.clone(), FieldValue::Null);
                continue;
            }
            let Some(target) = self.models.get(&relation.target) else {
                warn!(
                    "Relation `{}` on {} targets unregistered model {}; keeping raw value",
                    relation.field,
                    model.name(),
                    relation.target
                );
                fields.insert(relation.field.clone(), FieldValue::from(value));
                continue;
            };
            let resolved = match value {
                Value::Array(items) => {
                    let mut resolved = Vec::with_capacity(items.len());
                    for item in items {
                        resolved.push(self.resolve_related(&target, item)?);
                    }
                    FieldValue::Array(resolved)
                }
                single => self.resolve_related(&target, single)?,
            };
            fields.insert(relation.field.clone(), resolved);
        }
        for (field, value) in data {
            fields.insert(field, FieldValue::from(value));
        }
        Ok(fields)
    }

    /// Resolves one value sitting in a relation slot.
    ///
    /// Objects construct recursively through the target's declaration and
    /// come back as references. A `{"$ref": "<uuid>"}` marker that resolves
    /// is kept as the reference it names, so re-ingesting exported data is
    /// idempotent. Scalars pass through untouched: an identifier in a
    /// relation slot is data, not a fetch instruction.
    fn resolve_related(
        &mut self,
        target: &Arc<ModelDescriptor>,
        value: Value,
    ) -> GraphResult<FieldValue> {
        if let Some(existing) = FieldValue::ref_marker(&value) {
            return if self.records.contains(existing) {
                Ok(FieldValue::Ref(existing))
            } else {
                warn!(
                    "Reference marker {} for {} does not resolve; keeping raw value",
                    existing,
                    target.name()
                );
                Ok(FieldValue::from(value))
            };
        }
        match value {
            Value::Object(_) => Ok(FieldValue::Ref(self.build_instance(target, value)?)),
            other => Ok(FieldValue::from(other)),
        }
    }

    /// Lands resolved fields in the store: merge when the identifier is
    /// already tracked, commit fresh when it is new, stay detached when no
    /// usable identifier exists.
    fn commit_fields(
        &mut self,
        model: &Arc<ModelDescriptor>,
        fields: BTreeMap<String, FieldValue>,
    ) -> InstanceId {
        let key = fields
            .get(model.id_field())
            .and_then(FieldValue::to_id_key);
        let Some(key) = key else {
            let uid = self
                .records
                .insert_detached(Instance::new(model.name(), None, fields));
            debug!("Constructed detached {} instance {}", model.name(), uid);
            return uid;
        };

        match self.records.lookup(model.name(), &key) {
            Some(existing) => {
                // identity maps and the instance table stay in sync, so a
                // tracked handle always resolves
                if let Some(instance) = self.records.get_mut(existing) {
                    instance.merge_fields(fields);
                }
                debug!(
                    "Merged {} `{}` into existing instance {}",
                    model.name(),
                    key,
                    existing
                );
                existing
            }
            None => {
                let instance = Instance::new(model.name(), Some(key.clone()), fields);
                let uid = self.records.put(key.clone(), instance);
                debug!("Committed {} `{}` as instance {}", model.name(), key, uid);
                uid
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
