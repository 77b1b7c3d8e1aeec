//! Attribute Schema Registry and Normalizer
//!
//! - `registry` - per-type attribute declarations (kinds, defaults,
//!   exclusive flags); pure lookups
//! - `normalize` - completion of partial attribute bags and the patch
//!   (merge-then-renormalize) contract

pub mod normalize;
pub mod registry;

pub use normalize::{normalize, patch};
pub use registry::{schema_for, AttributeSchema, AttributeSpec, ValueKind};
