//! Tests for the component suggestion flow

#[cfg(test)]
mod tests {
    use crate::models::CustomComponentType;
    use crate::session::{EditorSession, Position};
    use crate::suggestion::{catalog, list_candidates, SuggestionFlow, SuggestionState};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_catalog_order_is_fixed() {
        let types: Vec<_> = catalog().iter().map(|c| c.component_type).collect();
        assert_eq!(
            types,
            vec![
                CustomComponentType::Button,
                CustomComponentType::RelatedItem,
                CustomComponentType::Banner,
                CustomComponentType::Entity,
            ]
        );
    }

    #[test]
    fn test_empty_query_returns_full_catalog() {
        assert_eq!(list_candidates("").len(), catalog().len());
        assert_eq!(list_candidates("   ").len(), catalog().len());
    }

    #[test]
    fn test_query_filters_by_label_and_type_name() {
        let banners = list_candidates("ban");
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].component_type, CustomComponentType::Banner);

        // Matching the wire type name works too
        let related = list_candidates("relatedit");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].component_type, CustomComponentType::RelatedItem);

        // Case-insensitive
        assert_eq!(list_candidates("BUTTON").len(), 1);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(list_candidates("zzz").is_empty());
    }

    #[test]
    fn test_highlight_wraps_both_directions() {
        let mut flow = SuggestionFlow::new();
        let len = catalog().len();

        flow.highlight_prev();
        assert_eq!(
            flow.highlighted().unwrap().component_type,
            catalog()[len - 1].component_type
        );

        flow.highlight_next();
        assert_eq!(
            flow.highlighted().unwrap().component_type,
            catalog()[0].component_type
        );

        for _ in 0..len {
            flow.highlight_next();
        }
        assert_eq!(
            flow.highlighted().unwrap().component_type,
            catalog()[0].component_type
        );
    }

    #[test]
    fn test_query_change_resets_highlight() {
        let mut flow = SuggestionFlow::new();
        flow.highlight_next();
        flow.highlight_next();
        flow.set_query("ban");
        assert_eq!(
            flow.highlighted().unwrap().component_type,
            CustomComponentType::Banner
        );
    }

    #[test]
    fn test_confirm_seeds_draft_with_defaults() {
        let mut flow = SuggestionFlow::new();
        flow.set_query("button");
        flow.confirm();

        let draft = flow.draft().expect("configuring");
        assert_eq!(draft["type"], json!("customButton"));
        assert_eq!(draft["align"], json!("center"));
        assert_eq!(draft["fullWidth"], json!(false));
    }

    #[test]
    fn test_confirm_with_no_matches_is_a_no_op() {
        let mut flow = SuggestionFlow::new();
        flow.set_query("zzz");
        flow.confirm();
        assert!(matches!(flow.state(), SuggestionState::Browsing { .. }));
    }

    #[test]
    fn test_commit_inserts_component() {
        let mut session = EditorSession::new();
        let mut flow = SuggestionFlow::new();
        flow.set_query("banner");
        flow.confirm();
        flow.set_field("title", json!("Spring Sale"));
        flow.commit(&mut session).unwrap();

        assert_eq!(flow.state(), &SuggestionState::Committed);
        let node = &session.document().blocks()[0];
        assert_eq!(node.node_type, "customComponent");
        assert_eq!(node.attrs["type"], json!("customBanner"));
        assert_eq!(node.attrs["title"], json!("Spring Sale"));
        // Unset fields land on their defaults
        assert_eq!(node.attrs["content"], json!("Banner content goes here..."));
    }

    #[test]
    fn test_commit_renormalizes_draft_values() {
        let mut session = EditorSession::new();
        let mut flow = SuggestionFlow::new();
        flow.set_query("related");
        flow.confirm();
        flow.set_field("maxItems", json!("40"));
        flow.commit(&mut session).unwrap();

        let node = &session.document().blocks()[0];
        assert_eq!(node.attrs["maxItems"], json!(10));
    }

    #[test]
    fn test_edit_existing_seeds_draft_from_node() {
        let mut session = EditorSession::new();
        let mut flow = SuggestionFlow::new();
        flow.confirm(); // Button is first
        flow.set_field("align", json!("right"));
        flow.commit(&mut session).unwrap();

        let mut flow =
            SuggestionFlow::edit_existing(&session, Position::root(0)).expect("editable");
        assert_eq!(flow.draft().unwrap()["align"], json!("right"));

        flow.set_field("fullWidth", json!(true));
        flow.commit(&mut session).unwrap();

        // Edited in place, not duplicated
        assert_eq!(session.document().blocks().len(), 1);
        let node = &session.document().blocks()[0];
        assert_eq!(node.attrs["fullWidth"], json!(true));
        assert_eq!(node.attrs["align"], json!("right"));
    }

    #[test]
    fn test_edit_existing_rejects_non_components() {
        let mut session = EditorSession::new();
        session
            .append(crate::models::DocNode::with_content(
                "paragraph",
                vec![crate::models::DocNode::text("x")],
            ))
            .unwrap();
        assert!(SuggestionFlow::edit_existing(&session, Position::root(0)).is_err());
        assert!(SuggestionFlow::edit_existing(&session, Position::root(9)).is_err());
    }

    #[test]
    fn test_escape_from_configuring_returns_to_browsing() {
        let mut flow = SuggestionFlow::new();
        flow.confirm();
        flow.set_field("align", json!("right"));
        flow.escape();

        assert!(matches!(flow.state(), SuggestionState::Browsing { .. }));
        assert_eq!(flow.draft(), None);

        // Re-confirming starts from clean defaults, not the discarded draft
        flow.confirm();
        assert_eq!(flow.draft().unwrap()["align"], json!("center"));
    }

    #[test]
    fn test_escape_from_browsing_dismisses() {
        let mut flow = SuggestionFlow::new();
        flow.escape();
        assert_eq!(flow.state(), &SuggestionState::Dismissed);
    }

    #[test]
    fn test_commit_outside_configuring_fails() {
        let mut session = EditorSession::new();
        let mut flow = SuggestionFlow::new();
        assert!(flow.commit(&mut session).is_err());
        assert!(session.document().is_empty());
        assert_eq!(session.value()["content"], Value::Null);
    }
}
