//! Document Editing Session
//!
//! The mutation protocol over one document: position-addressed insert,
//! attribute patching, exclusive-flag management, deletion, and selection,
//! plus the HTML projection boundary. Every mutation is gated on the
//! session mode and leaves the tree normalized.
//!
//! Positions are child-index paths from the document root (`[2]` is the
//! third top-level block, `[2, 0]` its first child). A path into an atomic
//! node's interior is never a legal position.
//!
//! # Examples
//!
//! ```rust
//! use richdoc_core::models::DocNode;
//! use richdoc_core::session::{EditorSession, Position};
//!
//! let mut session = EditorSession::new();
//! session
//!     .insert_at(
//!         Position::root(0),
//!         DocNode::with_content("paragraph", vec![DocNode::text("Hello")]),
//!     )
//!     .unwrap();
//! assert_eq!(session.document().blocks().len(), 1);
//! ```

pub mod error;

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::html::{document_to_html, html_to_document};
use crate::models::{DocNode, Document, NodeKind};
use crate::schema::{patch, schema_for};

pub use error::DocumentError;

/// A node address: the path of child indexes from the document root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Position(Vec<usize>);

impl Position {
    /// Position of a top-level block
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Build a position from a full path
    pub fn from_path(path: Vec<usize>) -> Self {
        Self(path)
    }

    /// Extend this position by one child index
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// The path segments
    pub fn path(&self) -> &[usize] {
        &self.0
    }

    /// Whether `other` equals this position or lies inside its subtree
    pub fn contains(&self, other: &Position) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    fn split_last(&self) -> Option<(&[usize], usize)> {
        let (last, parent) = self.0.split_last()?;
        Some((parent, *last))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{segment}")?;
        }
        write!(f, "]")
    }
}

/// Whether the session accepts mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Mutations apply normally
    #[default]
    Editable,
    /// Read-only; every mutation fails with `DocumentLocked`
    Locked,
}

/// An editing session over one document.
///
/// Owns the tree, the current selection, and the mode gate. The revision
/// counter increments on every successful mutation so hosts can detect
/// staleness cheaply.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    document: Document,
    selection: Option<Position>,
    mode: EditorMode,
    revision: u64,
}

impl EditorSession {
    /// Create a session over an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over an existing document
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Create a session from the persisted JSON value
    pub fn from_value(value: Option<Value>) -> Result<Self, DocumentError> {
        Ok(Self::with_document(Document::from_value(value)?))
    }

    /// The current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The persisted JSON value of the current document
    pub fn value(&self) -> Value {
        self.document.to_value()
    }

    /// The current selection, if any
    pub fn selection(&self) -> Option<&Position> {
        self.selection.as_ref()
    }

    /// The current mode
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch between editable and locked mode
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    /// Count of successful mutations on this session
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Resolve a position to a node, if one exists there
    pub fn node_at(&self, position: &Position) -> Option<&DocNode> {
        let (first, rest) = position.path().split_first()?;
        let mut node = self.document.blocks().get(*first)?;
        for index in rest {
            node = node.content.get(*index)?;
        }
        Some(node)
    }

    fn node_at_mut(&mut self, position: &Position) -> Option<&mut DocNode> {
        let (first, rest) = position.path().split_first()?;
        let mut node = self.document.blocks_mut().get_mut(*first)?;
        for index in rest {
            node = node.content.get_mut(*index)?;
        }
        Some(node)
    }

    fn require_editable(&self) -> Result<(), DocumentError> {
        match self.mode {
            EditorMode::Editable => Ok(()),
            EditorMode::Locked => Err(DocumentError::DocumentLocked),
        }
    }

    /// Insert a node at the given position.
    ///
    /// The position addresses an insertion point: its parent path must
    /// resolve to a container that admits the node's group (block-level
    /// nodes only at block boundaries, inline runs only inside
    /// textblocks), and the final index may be at most the container's
    /// current length. The node's attributes are normalized on the way in,
    /// and the selection moves to the inserted node.
    pub fn insert_at(&mut self, position: Position, node: DocNode) -> Result<(), DocumentError> {
        self.require_editable()?;

        let (parent, index) = position
            .split_last()
            .ok_or_else(|| DocumentError::invalid_position(&position, "empty path"))?;

        let node = normalized(node);

        let (slot, slot_kind) = if parent.is_empty() {
            (self.document.blocks_mut(), NodeKind::Block)
        } else {
            let parent_pos = Position::from_path(parent.to_vec());
            let container = self
                .node_at_mut(&parent_pos)
                .ok_or_else(|| DocumentError::node_not_found(&parent_pos))?;
            if container.kind() == NodeKind::Atomic {
                return Err(DocumentError::invalid_position(
                    &position,
                    "cannot insert inside an atomic node",
                ));
            }
            let slot_kind = match container.typed() {
                Some(typed) => typed.child_kind().ok_or_else(|| {
                    DocumentError::invalid_position(&position, "node admits no child content")
                })?,
                // Unknown container types stay addressable as block slots
                None => NodeKind::Block,
            };
            (&mut container.content, slot_kind)
        };

        let fits = match slot_kind {
            NodeKind::Inline => node.kind() == NodeKind::Inline,
            _ => node.kind() != NodeKind::Inline,
        };
        if !fits {
            return Err(DocumentError::invalid_position(
                &position,
                "node group does not match the container's content slot",
            ));
        }

        if index > slot.len() {
            return Err(DocumentError::invalid_position(
                &position,
                format!("index {index} out of bounds for container of length {}", slot.len()),
            ));
        }

        debug!(position = %position, node_type = %node.node_type, "inserting node");
        slot.insert(index, node);
        self.selection = Some(position);
        self.revision += 1;
        Ok(())
    }

    /// Append a node after the last top-level block
    pub fn append(&mut self, node: DocNode) -> Result<(), DocumentError> {
        self.insert_at(Position::root(self.document.blocks().len()), node)
    }

    /// Patch the attributes of the node at the given position.
    ///
    /// The partial bag is merged over the current attributes and the result
    /// renormalized, so the node's bag stays complete and a patch never has
    /// to repeat untouched attributes.
    pub fn update_attributes(
        &mut self,
        position: &Position,
        partial: &Map<String, Value>,
    ) -> Result<(), DocumentError> {
        self.require_editable()?;

        let node = self
            .node_at_mut(position)
            .ok_or_else(|| DocumentError::node_not_found(position))?;

        let node_type = node.node_type.clone();
        node.attrs = patch(&node_type, &node.attrs, partial);
        self.revision += 1;
        Ok(())
    }

    /// Patch the attributes of the selected node
    pub fn update_selected(&mut self, partial: &Map<String, Value>) -> Result<(), DocumentError> {
        let position = self
            .selection
            .clone()
            .ok_or_else(|| DocumentError::invalid_position(Position::default(), "no selection"))?;
        self.update_attributes(&position, partial)
    }

    /// Set an exclusive flag on the node at the given position.
    ///
    /// The flag must be declared exclusive in the target's schema. The
    /// flag is cleared on every other node that declares it and set on the
    /// target in one synchronous pass, so no intermediate state with two
    /// carriers is ever observable.
    pub fn set_exclusive_flag(
        &mut self,
        position: &Position,
        flag: &str,
    ) -> Result<(), DocumentError> {
        self.require_editable()?;

        let target = self
            .node_at(position)
            .ok_or_else(|| DocumentError::node_not_found(position))?;

        let key = schema_key(target);
        let declared_exclusive = schema_for(&key)
            .and_then(|schema| schema.attribute(flag))
            .map(|spec| spec.exclusive)
            .unwrap_or(false);
        if !declared_exclusive {
            return Err(DocumentError::schema_violation(
                key,
                format!("attribute '{flag}' is not an exclusive flag"),
            ));
        }

        clear_flag_in(self.document.blocks_mut(), flag);

        // Resolved above, so the target is still present
        if let Some(node) = self.node_at_mut(position) {
            node.attrs.insert(flag.to_string(), Value::Bool(true));
        }
        self.revision += 1;
        Ok(())
    }

    /// Delete the node at the given position.
    ///
    /// The node's subtree goes with it; children are not promoted. A
    /// selection on or inside the deleted subtree is cleared.
    pub fn delete_node(&mut self, position: &Position) -> Result<(), DocumentError> {
        self.require_editable()?;

        let (parent, index) = position
            .split_last()
            .ok_or_else(|| DocumentError::invalid_position(position, "empty path"))?;

        let slot = if parent.is_empty() {
            self.document.blocks_mut()
        } else {
            let parent_pos = Position::from_path(parent.to_vec());
            match self.node_at_mut(&parent_pos) {
                Some(container) => &mut container.content,
                None => return Err(DocumentError::node_not_found(position)),
            }
        };

        if index >= slot.len() {
            return Err(DocumentError::node_not_found(position));
        }

        debug!(position = %position, "deleting node");
        slot.remove(index);

        if let Some(selection) = &self.selection {
            if position.contains(selection) {
                self.selection = None;
            }
        }
        self.revision += 1;
        Ok(())
    }

    /// Delete the selected node
    pub fn delete_selected(&mut self) -> Result<(), DocumentError> {
        let position = self
            .selection
            .clone()
            .ok_or_else(|| DocumentError::invalid_position(Position::default(), "no selection"))?;
        self.delete_node(&position)
    }

    /// Move the selection to the node at the given position
    pub fn select_node(&mut self, position: Position) -> Result<(), DocumentError> {
        self.require_editable()?;
        if self.node_at(&position).is_none() {
            return Err(DocumentError::node_not_found(&position));
        }
        self.selection = Some(position);
        Ok(())
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Render the current document to HTML
    pub fn to_html(&self) -> String {
        document_to_html(&self.document)
    }

    /// Replace the document with the parse of an HTML fragment.
    ///
    /// On any parse failure the live document is untouched; the error is
    /// the only effect.
    pub fn apply_html(&mut self, html: &str) -> Result<(), DocumentError> {
        self.require_editable()?;

        let parsed = html_to_document(html)?;
        self.document = parsed;
        self.selection = None;
        self.revision += 1;
        Ok(())
    }
}

/// Schema registry key of a node: the flavor for custom components, the
/// node type for everything else
fn schema_key(node: &DocNode) -> String {
    if node.node_type == "customComponent" {
        node.attr_str("type").unwrap_or("customButton").to_string()
    } else {
        node.node_type.clone()
    }
}

/// Normalize a node's attribute bag through its schema on admission
fn normalized(mut node: DocNode) -> DocNode {
    node.attrs = crate::schema::normalize(&node.node_type, &node.attrs);
    node
}

fn clear_flag_in(nodes: &mut [DocNode], flag: &str) {
    for node in nodes {
        // Only nodes whose schema declares the flag exclusive carry it;
        // a same-named pass-through key on another type is left alone.
        let declares_exclusive = schema_for(&schema_key(node))
            .and_then(|schema| schema.attribute(flag))
            .map(|spec| spec.exclusive)
            .unwrap_or(false);
        if declares_exclusive {
            if let Some(value) = node.attrs.get_mut(flag) {
                if value.as_bool() == Some(true) {
                    *value = Value::Bool(false);
                }
            }
        }
        clear_flag_in(&mut node.content, flag);
    }
}
