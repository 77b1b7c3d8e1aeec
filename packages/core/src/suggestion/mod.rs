//! Component Suggestion Flow
//!
//! The slash-menu state machine for inserting and editing custom
//! components: a `Browsing` phase with a filtered, wrap-around candidate
//! list, and a `Configuring` phase holding a draft attribute bag until it
//! is committed into the session or discarded.
//!
//! The candidate catalog is fixed and ordered; filtering matches
//! case-insensitively over both the display label and the wire type name,
//! so "ban" and "customban" both find the banner.

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{CustomComponentType, DocNode};
use crate::schema::normalize;
use crate::session::{DocumentError, EditorSession, Position};

/// One entry in the component catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentCandidate {
    /// The component flavor this candidate inserts
    pub component_type: CustomComponentType,
    /// Display label shown in the menu
    pub label: &'static str,
    /// One-line description shown under the label
    pub description: &'static str,
}

/// The fixed component catalog, in menu order
pub fn catalog() -> &'static [ComponentCandidate] {
    const CATALOG: &[ComponentCandidate] = &[
        ComponentCandidate {
            component_type: CustomComponentType::Button,
            label: "Button",
            description: "One or more call-to-action buttons",
        },
        ComponentCandidate {
            component_type: CustomComponentType::RelatedItem,
            label: "Related Item",
            description: "Embed a list of related items",
        },
        ComponentCandidate {
            component_type: CustomComponentType::Banner,
            label: "Banner",
            description: "Highlighted banner with an optional action",
        },
        ComponentCandidate {
            component_type: CustomComponentType::Entity,
            label: "Custom Entity",
            description: "Reference an arbitrary entity by name and id",
        },
    ];
    CATALOG
}

/// Filter the catalog by a query string.
///
/// Empty queries return the full catalog. Matching is a case-insensitive
/// substring test over the label and the wire type name.
pub fn list_candidates(query: &str) -> Vec<ComponentCandidate> {
    let query = query.trim().to_ascii_lowercase();
    catalog()
        .iter()
        .filter(|candidate| {
            query.is_empty()
                || candidate.label.to_ascii_lowercase().contains(&query)
                || candidate
                    .component_type
                    .name()
                    .to_ascii_lowercase()
                    .contains(&query)
        })
        .copied()
        .collect()
}

/// Phase of the suggestion flow
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionState {
    /// Menu open; the user is filtering and moving the highlight
    Browsing { query: String, highlighted: usize },
    /// A component is picked; its draft attributes are being edited
    Configuring {
        component_type: CustomComponentType,
        draft: Map<String, Value>,
        /// `Some` when editing an existing node instead of inserting
        editing: Option<Position>,
    },
    /// The draft was committed into the document
    Committed,
    /// The menu was dismissed without committing
    Dismissed,
}

/// The suggestion state machine.
///
/// Holds no document state of its own; `commit` applies the draft to the
/// session it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionFlow {
    state: SuggestionState,
}

impl Default for SuggestionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionFlow {
    /// Open the menu in browsing state with an empty query
    pub fn new() -> Self {
        Self {
            state: SuggestionState::Browsing {
                query: String::new(),
                highlighted: 0,
            },
        }
    }

    /// Open the flow directly in configuring state for an existing
    /// component node, seeding the draft from its current attributes
    pub fn edit_existing(
        session: &EditorSession,
        position: Position,
    ) -> Result<Self, DocumentError> {
        let node = session
            .node_at(&position)
            .ok_or_else(|| DocumentError::node_not_found(&position))?;
        if node.node_type != "customComponent" {
            return Err(DocumentError::schema_violation(
                node.node_type.clone(),
                "only custom components are configurable",
            ));
        }

        let draft = normalize("customComponent", &node.attrs);
        let component_type = draft
            .get("type")
            .and_then(Value::as_str)
            .and_then(CustomComponentType::parse)
            .unwrap_or(CustomComponentType::Button);

        Ok(Self {
            state: SuggestionState::Configuring {
                component_type,
                draft,
                editing: Some(position),
            },
        })
    }

    /// The current phase
    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// The candidates visible under the current query (browsing only)
    pub fn candidates(&self) -> Vec<ComponentCandidate> {
        match &self.state {
            SuggestionState::Browsing { query, .. } => list_candidates(query),
            _ => Vec::new(),
        }
    }

    /// The currently highlighted candidate (browsing only)
    pub fn highlighted(&self) -> Option<ComponentCandidate> {
        match &self.state {
            SuggestionState::Browsing { query, highlighted } => {
                list_candidates(query).get(*highlighted).copied()
            }
            _ => None,
        }
    }

    /// Replace the filter query; the highlight resets to the first match
    pub fn set_query(&mut self, new_query: impl Into<String>) {
        if let SuggestionState::Browsing { query, highlighted } = &mut self.state {
            *query = new_query.into();
            *highlighted = 0;
        }
    }

    /// Move the highlight down, wrapping past the end
    pub fn highlight_next(&mut self) {
        self.move_highlight(1);
    }

    /// Move the highlight up, wrapping past the start
    pub fn highlight_prev(&mut self) {
        self.move_highlight(-1);
    }

    fn move_highlight(&mut self, delta: isize) {
        if let SuggestionState::Browsing { query, highlighted } = &mut self.state {
            let len = list_candidates(query).len();
            if len == 0 {
                return;
            }
            let next = (*highlighted as isize + delta).rem_euclid(len as isize);
            *highlighted = next as usize;
        }
    }

    /// Confirm the highlighted candidate (Enter).
    ///
    /// Moves to configuring with a draft of the flavor's defaults. With no
    /// matching candidates this is a no-op.
    pub fn confirm(&mut self) {
        let Some(candidate) = self.highlighted() else {
            return;
        };

        let mut seed = Map::new();
        seed.insert(
            "type".to_string(),
            Value::String(candidate.component_type.name().to_string()),
        );
        debug!(component = candidate.component_type.name(), "configuring component");
        self.state = SuggestionState::Configuring {
            component_type: candidate.component_type,
            draft: normalize("customComponent", &seed),
            editing: None,
        };
    }

    /// Set one attribute on the draft (configuring only).
    ///
    /// The value is taken as-is; the commit renormalizes the whole bag.
    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        if let SuggestionState::Configuring { draft, .. } = &mut self.state {
            draft.insert(key.into(), value);
        }
    }

    /// The current draft attributes (configuring only)
    pub fn draft(&self) -> Option<&Map<String, Value>> {
        match &self.state {
            SuggestionState::Configuring { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Commit the draft into the session (configuring only).
    ///
    /// Inserting appends a new component after the last block; editing
    /// patches the node the flow was opened on. The flow ends committed on
    /// success and is left unchanged on failure.
    pub fn commit(&mut self, session: &mut EditorSession) -> Result<(), DocumentError> {
        let SuggestionState::Configuring { draft, editing, .. } = &self.state else {
            return Err(DocumentError::schema_violation(
                "customComponent",
                "nothing is being configured",
            ));
        };

        match editing {
            Some(position) => {
                let position = position.clone();
                let draft = draft.clone();
                session.update_attributes(&position, &draft)?;
            }
            None => {
                let node = DocNode::new("customComponent", draft.clone());
                session.append(node)?;
            }
        }

        self.state = SuggestionState::Committed;
        Ok(())
    }

    /// Escape: configuring falls back to browsing (the draft is
    /// discarded); browsing dismisses the menu
    pub fn escape(&mut self) {
        self.state = match &self.state {
            SuggestionState::Configuring { .. } => SuggestionState::Browsing {
                query: String::new(),
                highlighted: 0,
            },
            SuggestionState::Browsing { .. } => SuggestionState::Dismissed,
            other => other.clone(),
        };
    }
}

#[cfg(test)]
#[path = "suggestion_test.rs"]
mod suggestion_test;
