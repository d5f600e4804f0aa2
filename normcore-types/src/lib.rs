//! Core type definitions for Normcore.
//!
//! This crate defines the fundamental types the normalization engine builds
//! on:
//! - Instance handles (UUID v7) and identity keys
//! - The field value model: JSON plus shared instance references
//!
//! Domain knowledge (entity types, relations, construction) lives in the
//! model and graph crates, not here.

mod ids;
mod value;

pub use ids::{IdKey, InstanceId};
pub use value::{FieldValue, REF_KEY};
