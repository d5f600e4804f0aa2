//! Relationship resolution and identity-map construction for Normcore.
//!
//! This is the crate callers use. An [`EntityGraph`] owns a model registry
//! and a record store; feeding it JSON payloads produces canonical,
//! interlinked instances:
//! - one instance per (type, identifier), however many payloads mention it
//! - relation fields resolved depth-first into shared handles
//! - duplicate identifiers merged in place, so existing handles stay valid
//! - cyclic and self-referential payloads handled without special casing
//!
//! The declaration surface ([`ModelDescriptor`], [`ModelRegistry`]) and the
//! storage types ([`Instance`], [`RecordStore`]) are re-exported here so a
//! single dependency covers typical use.

mod defaults;
mod error;
mod graph;
mod normalize;

pub use error::{GraphError, GraphResult};
pub use graph::EntityGraph;

pub use normcore_model::{
    DefaultsFn, ModelDescriptor, ModelRegistry, RawData, Relation, SetupContext, SetupFn,
};
pub use normcore_store::{IdentityMap, Instance, RecordStore};
pub use normcore_types::{FieldValue, IdKey, InstanceId, REF_KEY};
