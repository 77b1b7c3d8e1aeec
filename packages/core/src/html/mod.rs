//! HTML Projection
//!
//! Bidirectional mapping between the structured document tree and HTML:
//!
//! - `dom` - the `DomSpec` intermediate the serializer renders through
//! - `serialize` - structured tree -> HTML string
//! - `parse` - HTML fragment -> structured tree (html5ever), rule-ordered
//!   so composite shapes (`figure` + `img`) win over their parts
//!
//! Serialization is total over known node types; parsing is lenient and
//! normalizing, but refuses input that yields nothing usable.

pub mod dom;
pub mod parse;
pub mod serialize;

pub use dom::{DomChild, DomSpec};
pub use parse::{html_to_document, HtmlParseError};
pub use serialize::{document_to_html, node_to_dom};
