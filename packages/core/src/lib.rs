//! # Richdoc Core
//!
//! Headless core of the Richdoc rich-document editor: a structured document
//! model with a schema-driven attribute normalizer, a bidirectional HTML
//! projection, a position-addressed mutation protocol, and the component
//! suggestion flow. Rendering, persistence, and network concerns all live
//! in the host; this crate is pure data and logic.
//!
//! ## Architecture
//!
//! - [`models`] - the universal node tree, its JSON wire form, and typed
//!   views over custom-component and image attribute bags
//! - [`schema`] - per-type attribute declarations and the lenient
//!   normalizer (defaults, coercion, clamping, legacy migrations)
//! - [`html`] - tree -> HTML serialization and html5ever-based parsing
//! - [`session`] - the editing session: insert, patch, exclusive flags,
//!   delete, selection, and the HTML boundary, gated on an edit mode
//! - [`suggestion`] - the slash-menu state machine for inserting and
//!   editing custom components
//! - [`assets`] - the host-implemented media resolution seam
//!
//! ## Example
//!
//! ```rust
//! use richdoc_core::models::DocNode;
//! use richdoc_core::session::{EditorSession, Position};
//! use serde_json::json;
//!
//! let mut session = EditorSession::new();
//! session
//!     .insert_at(
//!         Position::root(0),
//!         DocNode::new(
//!             "image",
//!             json!({ "src": "a.jpg" }).as_object().cloned().unwrap(),
//!         ),
//!     )
//!     .unwrap();
//!
//! // The bag is complete after insertion, and the projection reflects it.
//! assert!(session.to_html().starts_with("<img "));
//! ```

pub mod assets;
pub mod html;
pub mod models;
pub mod schema;
pub mod session;
pub mod suggestion;

pub use assets::{AssetError, AssetResolver, ResolvedAsset};
pub use models::{DocNode, Document, Mark, ValidationError};
pub use session::{DocumentError, EditorMode, EditorSession, Position};
pub use suggestion::{ComponentCandidate, SuggestionFlow, SuggestionState};
