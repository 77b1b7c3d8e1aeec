//! Tests for typed custom component attributes and migrations

#[cfg(test)]
mod tests {
    use crate::models::custom_component::migrate_component_bag;
    use crate::models::{
        ButtonSize, ButtonVariant, CustomComponentAttrs, CustomComponentType, RelatedLayout,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map, Value};

    fn bag(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn test_type_name_parsing() {
        assert_eq!(
            CustomComponentType::parse("customButton"),
            Some(CustomComponentType::Button)
        );
        assert_eq!(
            CustomComponentType::parse("customRelatedPost"),
            Some(CustomComponentType::RelatedItem)
        );
        assert_eq!(CustomComponentType::parse("customCarousel"), None);
    }

    #[test]
    fn test_button_decode_and_reencode() {
        let raw = bag(json!({
            "type": "customButton",
            "buttons": [
                { "title": "Buy", "url": "https://e.com", "variant": "outline", "size": "large" },
            ],
            "align": "right",
            "fullWidth": true,
        }));
        let attrs = CustomComponentAttrs::from_bag(&raw).unwrap();
        let CustomComponentAttrs::Button(button) = &attrs else {
            panic!("expected button");
        };
        assert_eq!(button.buttons[0].variant, ButtonVariant::Outline);
        assert_eq!(button.buttons[0].size, ButtonSize::Large);
        assert!(button.full_width);

        assert_eq!(attrs.to_bag(), raw);
    }

    #[test]
    fn test_missing_type_is_an_error() {
        assert!(CustomComponentAttrs::from_bag(&bag(json!({ "align": "left" }))).is_err());
    }

    #[test]
    fn test_defaults_per_flavor() {
        let CustomComponentAttrs::Button(button) =
            CustomComponentAttrs::defaults(CustomComponentType::Button)
        else {
            panic!("expected button");
        };
        assert_eq!(button.buttons.len(), 1);
        assert_eq!(button.buttons[0].title, "Click me");

        let CustomComponentAttrs::RelatedItem(related) =
            CustomComponentAttrs::defaults(CustomComponentType::RelatedItem)
        else {
            panic!("expected related item");
        };
        assert_eq!(related.max_items, 3);
        assert_eq!(related.layout, RelatedLayout::Grid);
    }

    #[test]
    fn test_item_id_list_parsing() {
        let CustomComponentAttrs::RelatedItem(related) = CustomComponentAttrs::from_bag(&bag(
            json!({ "type": "customRelatedItem", "itemId": " 12, 34 ,,56 " }),
        ))
        .unwrap() else {
            panic!("expected related item");
        };
        assert_eq!(related.item_ids(), vec!["12", "34", "56"]);
    }

    #[test]
    fn test_related_post_rename_migration() {
        let migrated = migrate_component_bag(bag(json!({
            "type": "customRelatedPost",
            "itemId": "7",
        })));
        assert_eq!(migrated["type"], json!("customRelatedItem"));
        assert_eq!(migrated["itemId"], json!("7"));
    }

    #[test]
    fn test_flat_button_migration() {
        let migrated = migrate_component_bag(bag(json!({
            "type": "customButton",
            "title": "Go",
            "url": "https://e.com",
            "variant": "secondary",
            "size": "small",
        })));
        let buttons = migrated["buttons"].as_array().unwrap();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0]["title"], json!("Go"));
        assert_eq!(buttons[0]["size"], json!("small"));
        assert!(!migrated.contains_key("title"));

        // A bag that already has a buttons array is left alone
        let canonical = bag(json!({
            "type": "customButton",
            "buttons": [{ "title": "Keep" }],
        }));
        assert_eq!(migrate_component_bag(canonical.clone()), canonical);
    }

    #[test]
    fn test_banner_migration_drops_dead_attributes() {
        let migrated = migrate_component_bag(bag(json!({
            "type": "customBanner",
            "bannerTitle": "Sale",
            "theme": "dark",
            "closable": true,
        })));
        assert_eq!(migrated["title"], json!("Sale"));
        assert!(!migrated.contains_key("bannerTitle"));
        assert!(!migrated.contains_key("theme"));
        assert!(!migrated.contains_key("closable"));
    }

    #[test]
    fn test_carousel_layout_migration() {
        let migrated = migrate_component_bag(bag(json!({
            "type": "customRelatedItem",
            "layout": "carousel",
        })));
        assert_eq!(migrated["layout"], json!("grid"));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let legacy = bag(json!({
            "type": "customRelatedPost",
            "layout": "carousel",
        }));
        let once = migrate_component_bag(legacy);
        let twice = migrate_component_bag(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_lenient_decode_falls_back_to_defaults() {
        // A buttons value of the wrong shape decodes to the default set
        // instead of failing the whole node.
        let attrs = CustomComponentAttrs::from_bag(&bag(json!({
            "type": "customButton",
            "buttons": "not-an-array",
        })))
        .unwrap();
        let CustomComponentAttrs::Button(button) = attrs else {
            panic!("expected button");
        };
        assert_eq!(button.buttons[0].title, "Click me");
    }

    #[test]
    fn test_banner_action_nullability() {
        let CustomComponentAttrs::Banner(banner) = CustomComponentAttrs::from_bag(&bag(json!({
            "type": "customBanner",
            "action": { "text": "Shop", "url": "/shop" },
        })))
        .unwrap() else {
            panic!("expected banner");
        };
        let action = banner.action.unwrap();
        assert_eq!(action.text, "Shop");

        let CustomComponentAttrs::Banner(banner) = CustomComponentAttrs::from_bag(&bag(json!({
            "type": "customBanner",
            "action": null,
        })))
        .unwrap() else {
            panic!("expected banner");
        };
        assert!(banner.action.is_none());
    }

    #[test]
    fn test_entity_custom_attrs_pass_through() {
        let raw = bag(json!({
            "type": "customEntity",
            "entity_name": "product",
            "entity_id": "42",
            "custom_attrs": { "badge": "new", "stock": 7 },
        }));
        let attrs = CustomComponentAttrs::from_bag(&raw).unwrap();
        assert_eq!(attrs.to_bag(), raw);
    }
}
