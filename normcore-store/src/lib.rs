//! Instance storage for Normcore.
//!
//! The [`RecordStore`] is the arena every constructed instance lives in:
//! - [`Instance`]: one entity's data, plus the model name and identity key
//!   it is tracked under
//! - [`IdentityMap`]: per-type registry mapping identifiers to canonical
//!   handles
//! - [`RecordStore`]: the instance table plus the identity maps
//!
//! Holders never own instances; they hold `InstanceId` handles and read or
//! mutate through the store. That is what makes shared references and
//! cyclic entity graphs safe to represent.

mod identity;
mod instance;
mod store;

pub use identity::IdentityMap;
pub use instance::Instance;
pub use store::RecordStore;
