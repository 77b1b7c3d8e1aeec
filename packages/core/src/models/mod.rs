//! Data Models
//!
//! This module contains the core data structures of the Richdoc document
//! model:
//!
//! - `DocNode` / `Document` - the universal node tree and its JSON wire form
//! - Typed custom-component attribute variants (tagged union by `type`)
//! - Typed image attributes with width parsing
//!
//! All nodes store their entity-specific data in the `attrs` bag; the typed
//! structs here are views over normalized bags, not a second storage format.

mod custom_component;
mod image;
mod node;

pub use custom_component::{
    migrate_component_bag, Align, BannerAction, ButtonItem, ButtonSize, ButtonVariant,
    CustomBannerAttrs, CustomButtonAttrs, CustomComponentAttrs, CustomComponentType,
    CustomEntityAttrs, CustomRelatedItemAttrs, RelatedLayout,
};
pub use image::{ImageAttrs, ImageWidth, ObjectFit};
pub use node::{DocNode, Document, Mark, NodeKind, NodeType, ValidationError};
