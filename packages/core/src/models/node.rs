//! Document Tree Structures
//!
//! This module defines the core `DocNode` struct and the `Document` root for
//! Richdoc's structured rich-document model.
//!
//! # Architecture
//!
//! - **Universal Node**: a single struct represents every content type
//! - **Wire-compatible JSON**: nodes serialize to the persisted editor format
//!   (`{"type": ..., "attrs": ..., "content": ..., "text": ..., "marks": ...}`)
//! - **Typed classification**: `NodeType` is the closed catalog of known
//!   types; classification into block / inline / atomic drives the mutation
//!   protocol's position rules
//!
//! # Examples
//!
//! ```rust
//! use richdoc_core::models::{DocNode, Document};
//! use serde_json::json;
//!
//! // A paragraph with one text run
//! let para = DocNode::with_content("paragraph", vec![DocNode::text("Hello")]);
//!
//! // An atomic custom component
//! let button = DocNode::new(
//!     "customComponent",
//!     json!({ "type": "customButton" }).as_object().cloned().unwrap(),
//! );
//!
//! let doc = Document::from_blocks(vec![para, button]);
//! assert_eq!(doc.blocks().len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Validation errors for document trees and node wrappers
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("Invalid document root: expected type 'doc', got '{0}'")]
    InvalidRoot(String),

    #[error("Invalid attribute '{attribute}' on '{node_type}': {reason}")]
    InvalidAttribute {
        node_type: String,
        attribute: String,
        reason: String,
    },

    #[error("Malformed document value: {0}")]
    MalformedValue(String),
}

/// Closed catalog of node types known to the document model.
///
/// Custom components all share the `customComponent` node type; their
/// concrete flavor lives in the `type` attribute (see
/// [`crate::models::CustomComponentType`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Blockquote,
    CodeBlock,
    BulletList,
    OrderedList,
    ListItem,
    HorizontalRule,
    HardBreak,
    Text,
    Image,
    Iframe,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    CustomComponent,
}

/// Structural classification used by the mutation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Block-level node, insertable at block boundaries
    Block,
    /// Inline content (text runs, hard breaks)
    Inline,
    /// Indivisible block-level unit with no editable child content
    Atomic,
}

impl NodeType {
    /// Parse a wire-format type name into the closed catalog.
    ///
    /// Returns `None` for unknown names; callers decide whether to pass the
    /// node through untouched or drop it.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "doc" => Some(Self::Doc),
            "paragraph" => Some(Self::Paragraph),
            "heading" => Some(Self::Heading),
            "blockquote" => Some(Self::Blockquote),
            "codeBlock" => Some(Self::CodeBlock),
            "bulletList" => Some(Self::BulletList),
            "orderedList" => Some(Self::OrderedList),
            "listItem" => Some(Self::ListItem),
            "horizontalRule" => Some(Self::HorizontalRule),
            "hardBreak" => Some(Self::HardBreak),
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "iframe" => Some(Self::Iframe),
            "table" => Some(Self::Table),
            "tableRow" => Some(Self::TableRow),
            "tableHeader" => Some(Self::TableHeader),
            "tableCell" => Some(Self::TableCell),
            "customComponent" => Some(Self::CustomComponent),
            _ => None,
        }
    }

    /// Wire-format name of this type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::Blockquote => "blockquote",
            Self::CodeBlock => "codeBlock",
            Self::BulletList => "bulletList",
            Self::OrderedList => "orderedList",
            Self::ListItem => "listItem",
            Self::HorizontalRule => "horizontalRule",
            Self::HardBreak => "hardBreak",
            Self::Text => "text",
            Self::Image => "image",
            Self::Iframe => "iframe",
            Self::Table => "table",
            Self::TableRow => "tableRow",
            Self::TableHeader => "tableHeader",
            Self::TableCell => "tableCell",
            Self::CustomComponent => "customComponent",
        }
    }

    /// Structural classification of this type
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Text | Self::HardBreak => NodeKind::Inline,
            Self::Image | Self::Iframe | Self::HorizontalRule | Self::CustomComponent => {
                NodeKind::Atomic
            }
            _ => NodeKind::Block,
        }
    }

    /// Whether nodes of this type may hold child content.
    ///
    /// Atomic nodes own no editable children; their entire state lives in
    /// the attribute map.
    pub fn has_content(&self) -> bool {
        !matches!(self.kind(), NodeKind::Atomic) && !matches!(self, Self::Text)
    }

    /// The kind of children this type's content slot admits.
    ///
    /// Block containers take blocks and atomics; textblocks take inline
    /// runs; atomic nodes and text runs admit nothing (`None`). The
    /// mutation protocol uses this to keep block-level nodes at block
    /// boundaries.
    pub fn child_kind(&self) -> Option<NodeKind> {
        match self {
            Self::Doc
            | Self::Blockquote
            | Self::BulletList
            | Self::OrderedList
            | Self::ListItem
            | Self::Table
            | Self::TableRow => Some(NodeKind::Block),
            Self::Paragraph
            | Self::Heading
            | Self::CodeBlock
            | Self::TableHeader
            | Self::TableCell => Some(NodeKind::Inline),
            _ => None,
        }
    }
}

/// A formatting mark applied to a text run (bold, italic, link, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// Mark type name ("bold", "italic", "strike", "underline", "code", "link")
    #[serde(rename = "type")]
    pub mark_type: String,

    /// Mark attributes (only links carry any: `href`, optional `target`)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
}

impl Mark {
    /// Create a mark with no attributes
    pub fn new(mark_type: impl Into<String>) -> Self {
        Self {
            mark_type: mark_type.into(),
            attrs: Map::new(),
        }
    }

    /// Create a link mark
    pub fn link(href: impl Into<String>) -> Self {
        let mut attrs = Map::new();
        attrs.insert("href".to_string(), Value::String(href.into()));
        Self {
            mark_type: "link".to_string(),
            attrs,
        }
    }
}

/// Universal node for every element of the document tree.
///
/// The `node_type` field is the wire-format type tag; `attrs` is the
/// string-keyed, JSON-valued attribute map that the schema registry and
/// normalizer operate on. Text runs carry their characters in `text` and
/// their formatting in `marks`; everything else carries ordered children in
/// `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    /// Wire-format type tag (e.g. "paragraph", "image", "customComponent")
    #[serde(rename = "type")]
    pub node_type: String,

    /// Attribute map; complete per the registry schema after normalization
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,

    /// Ordered child nodes (empty for text runs and atomic nodes)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<DocNode>,

    /// Text content (text runs only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Formatting marks (text runs only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl DocNode {
    /// Create a node with the given type and attribute map
    pub fn new(node_type: impl Into<String>, attrs: Map<String, Value>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs,
            content: Vec::new(),
            text: None,
            marks: Vec::new(),
        }
    }

    /// Create a node with no attributes and the given children
    pub fn with_content(node_type: impl Into<String>, content: Vec<DocNode>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: Map::new(),
            content,
            text: None,
            marks: Vec::new(),
        }
    }

    /// Create an unmarked text run
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            node_type: "text".to_string(),
            attrs: Map::new(),
            content: Vec::new(),
            text: Some(text.into()),
            marks: Vec::new(),
        }
    }

    /// Create a text run carrying the given marks
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            marks,
            ..Self::text(text)
        }
    }

    /// Typed view of the node's type tag, if it is in the closed catalog
    pub fn typed(&self) -> Option<NodeType> {
        NodeType::parse(&self.node_type)
    }

    /// Structural classification; unknown types are treated as blocks so
    /// that forward-compatible content stays addressable.
    pub fn kind(&self) -> NodeKind {
        self.typed().map(|t| t.kind()).unwrap_or(NodeKind::Block)
    }

    /// Whether this node is an indivisible unit with no interior positions
    pub fn is_atomic(&self) -> bool {
        self.kind() == NodeKind::Atomic
    }

    /// String attribute accessor; `None` for missing or non-string values
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Boolean attribute accessor; `None` for missing or non-bool values
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attrs.get(key).and_then(Value::as_bool)
    }

    /// Integer attribute accessor; `None` for missing or non-integer values
    pub fn attr_i64(&self, key: &str) -> Option<i64> {
        self.attrs.get(key).and_then(Value::as_i64)
    }

    /// Concatenated text content of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }
}

/// The document root: an ordered tree of nodes.
///
/// Serializes to the persisted wire format `{"type": "doc", "content": [...]}`.
/// The document is owned by the active editing session; persistence of the
/// JSON value is the host form framework's concern.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    blocks: Vec<DocNode>,
}

impl Document {
    /// Create an empty document
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a document from top-level block nodes
    pub fn from_blocks(blocks: Vec<DocNode>) -> Self {
        Self { blocks }
    }

    /// Top-level block nodes
    pub fn blocks(&self) -> &[DocNode] {
        &self.blocks
    }

    /// Mutable access to the top-level block nodes
    pub fn blocks_mut(&mut self) -> &mut Vec<DocNode> {
        &mut self.blocks
    }

    /// Whether the document has no content
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Decode a document from its persisted JSON value.
    ///
    /// `None` and `Value::Null` both denote a valid empty document (the
    /// field value contract allows a null initial state).
    pub fn from_value(value: Option<Value>) -> Result<Self, ValidationError> {
        let value = match value {
            None | Some(Value::Null) => return Ok(Self::empty()),
            Some(value) => value,
        };

        let root: DocNode = serde_json::from_value(value)
            .map_err(|err| ValidationError::MalformedValue(err.to_string()))?;

        if root.node_type != "doc" {
            return Err(ValidationError::InvalidRoot(root.node_type));
        }

        Ok(Self {
            blocks: root.content,
        })
    }

    /// Encode the document to its persisted JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(DocNode::with_content("doc", self.blocks.clone()))
            .unwrap_or_else(|_| Value::Null)
    }

    /// Depth-first iterator over every node in the tree
    pub fn iter(&self) -> impl Iterator<Item = &DocNode> {
        let mut stack: Vec<&DocNode> = self.blocks.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            for child in node.content.iter().rev() {
                stack.push(child);
            }
            Some(node)
        })
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
