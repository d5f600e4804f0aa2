//! Default shape computation and merge.

use crate::{GraphError, GraphResult};
use normcore_model::{ModelDescriptor, RawData};

/// Computes the model's default shape for `raw`, then merges the raw input
/// over it.
///
/// The merge is shallow and field-level: a field present in the input wins
/// over the same field in the defaults, absent fields fall back to their
/// default, and input fields the defaults never mention pass through
/// untouched. Nested objects are not merged recursively.
pub(crate) fn apply_defaults(model: &ModelDescriptor, raw: RawData) -> GraphResult<RawData> {
    if !model.has_defaults() {
        return Ok(raw);
    }
    let mut shape = model
        .default_shape(&raw)
        .map_err(|message| GraphError::Defaults {
            model: model.name().to_string(),
            message,
        })?;
    for (field, value) in raw {
        shape.insert(field, value);
    }
    Ok(shape)
}
