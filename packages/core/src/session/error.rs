//! Editing Session Errors
//!
//! Error taxonomy for the document mutation protocol. Schema problems are
//! recovered locally by the normalizer and never surface from mutation
//! calls; everything here is a structural failure the caller must handle.

use thiserror::Error;

use crate::html::HtmlParseError;
use crate::models::ValidationError;

/// Errors surfaced by document mutation and projection operations
#[derive(Error, Debug)]
pub enum DocumentError {
    /// An attribute bag violated its schema in a way the normalizer could
    /// not recover (currently only mis-declared exclusive flags)
    #[error("Schema violation on '{node_type}': {reason}")]
    SchemaViolation { node_type: String, reason: String },

    /// A position does not address a legal insertion point or node
    #[error("Invalid position {position}: {reason}")]
    InvalidPosition { position: String, reason: String },

    /// A position addressed a node that no longer exists
    #[error("No node at position {position}")]
    NodeNotFound { position: String },

    /// HTML input could not be projected onto the document model
    #[error("Malformed HTML: {0}")]
    MalformedHtml(#[from] HtmlParseError),

    /// The session is in locked mode; mutations are rejected
    #[error("Document is locked; mutation rejected")]
    DocumentLocked,

    /// The document value itself failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DocumentError {
    /// Create a schema violation error
    pub fn schema_violation(node_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            node_type: node_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid position error
    pub fn invalid_position(position: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidPosition {
            position: position.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a node-not-found error
    pub fn node_not_found(position: impl ToString) -> Self {
        Self::NodeNotFound {
            position: position.to_string(),
        }
    }
}
