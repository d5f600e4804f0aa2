//! Entity type declarations for Normcore.
//!
//! Defines how callers describe their domain to the engine:
//! - [`ModelDescriptor`]: one entity type with its name, identifier field,
//!   defaults function, setup hook, and declared relations
//! - [`Relation`]: an explicit declaration that a field holds data of a
//!   target entity type
//! - [`ModelRegistry`]: alias-scoped registry of declarations by name
//! - [`SetupContext`]: the read access setup hooks get to models and records
//!
//! Descriptors carry behavior (closures) as well as shape, so they are
//! shared via `Arc` rather than cloned.

mod context;
mod descriptor;
mod registry;

pub use context::SetupContext;
pub use descriptor::{DefaultsFn, ModelDescriptor, RawData, Relation, SetupFn};
pub use registry::ModelRegistry;
