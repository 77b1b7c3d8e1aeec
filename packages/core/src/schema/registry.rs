//! Attribute Schema Registry
//!
//! The single source of truth for the attribute shape of every node type:
//! per type, the set of declared attributes, their value kinds, and their
//! default values. The normalizer consults this registry to complete
//! partial attribute bags; the HTML projection consults it to decide which
//! attributes have a DOM representation.
//!
//! Custom component flavors (`customButton`, `customRelatedItem`, ...) are
//! registered under their own keys even though they share the
//! `customComponent` node type on the wire, because each flavor carries a
//! distinct attribute set.
//!
//! Lookups are pure; the registry has no side effects and is built once.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Declared value kind of an attribute, driving coercion in the normalizer
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// UTF-8 string
    Str,
    /// Integer clamped to an inclusive range
    Int { min: i64, max: i64 },
    /// Floating point number
    Float,
    /// Boolean
    Bool,
    /// String restricted to a closed value set
    Enum(&'static [&'static str]),
    /// JSON array
    Array,
    /// JSON object
    Object,
    /// Any JSON value, passed through untouched (forward-compat bags)
    Any,
}

/// Declaration of a single attribute in a node type's schema
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    /// Attribute name as stored in the bag (camelCase wire names)
    pub name: &'static str,
    /// Value kind for coercion
    pub kind: ValueKind,
    /// Value substituted when the attribute is absent
    pub default: Value,
    /// Whether `null` is a legal value (absent still takes the default)
    pub nullable: bool,
    /// Whether at most one node in the document may have this flag `true`
    pub exclusive: bool,
}

impl AttributeSpec {
    fn new(name: &'static str, kind: ValueKind, default: Value) -> Self {
        Self {
            name,
            kind,
            default,
            nullable: false,
            exclusive: false,
        }
    }

    fn nullable(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            default: Value::Null,
            nullable: true,
            exclusive: false,
        }
    }

    fn exclusive_flag(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Bool,
            default: Value::Bool(false),
            nullable: false,
            exclusive: true,
        }
    }
}

/// The complete attribute schema of one node type
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    /// Registry key ("image", "heading", "customButton", ...)
    pub key: &'static str,
    /// Declared attributes, in declaration order
    pub attributes: Vec<AttributeSpec>,
}

impl AttributeSchema {
    /// Look up one attribute declaration by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|spec| spec.name == name)
    }

    /// Whether the schema declares the given attribute
    pub fn declares(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Look up an attribute case-insensitively.
    ///
    /// HTML attribute names are lowercased by parsers, so `data-fullWidth`
    /// comes back as `data-fullwidth`; the HTML parser uses this to recover
    /// the declared camelCase name.
    pub fn attribute_ignore_case(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    /// Declarations of exclusive-per-document flags on this type
    pub fn exclusive_flags(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.attributes.iter().filter(|spec| spec.exclusive)
    }
}

const ALIGN_VALUES: &[&str] = &["left", "center", "right"];
const OBJECT_FIT_VALUES: &[&str] = &["contain", "cover", "fill"];
const LAYOUT_VALUES: &[&str] = &["grid", "list"];

static SCHEMAS: LazyLock<HashMap<&'static str, AttributeSchema>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    let mut register = |key: &'static str, attributes: Vec<AttributeSpec>| {
        map.insert(key, AttributeSchema { key, attributes });
    };

    register(
        "heading",
        vec![AttributeSpec::new(
            "level",
            ValueKind::Int { min: 1, max: 4 },
            json!(1),
        )],
    );

    register(
        "codeBlock",
        vec![AttributeSpec::nullable("language", ValueKind::Str)],
    );

    register(
        "orderedList",
        vec![AttributeSpec::new(
            "start",
            ValueKind::Int {
                min: 1,
                max: i64::MAX,
            },
            json!(1),
        )],
    );

    register(
        "image",
        vec![
            AttributeSpec::new("src", ValueKind::Str, json!("")),
            AttributeSpec::new("alt", ValueKind::Str, json!("")),
            AttributeSpec::nullable("title", ValueKind::Str),
            AttributeSpec::nullable("caption", ValueKind::Str),
            AttributeSpec::new("width", ValueKind::Str, json!("90%")),
            AttributeSpec::nullable(
                "pixelWidth",
                ValueKind::Int {
                    min: 0,
                    max: i64::MAX,
                },
            ),
            AttributeSpec::nullable(
                "pixelHeight",
                ValueKind::Int {
                    min: 0,
                    max: i64::MAX,
                },
            ),
            AttributeSpec::nullable("aspectRatio", ValueKind::Float),
            AttributeSpec::new("align", ValueKind::Enum(ALIGN_VALUES), json!("center")),
            AttributeSpec::new(
                "objectFit",
                ValueKind::Enum(OBJECT_FIT_VALUES),
                json!("contain"),
            ),
            AttributeSpec::new("mobileWidth", ValueKind::Str, json!("100%")),
            AttributeSpec::new("useResponsive", ValueKind::Bool, json!(true)),
            AttributeSpec::exclusive_flag("isFeatured"),
            AttributeSpec::nullable("srcset", ValueKind::Str),
        ],
    );

    register(
        "iframe",
        vec![
            AttributeSpec::new("src", ValueKind::Str, json!("")),
            AttributeSpec::new("width", ValueKind::Str, json!("100%")),
            AttributeSpec::new("height", ValueKind::Str, json!("400")),
        ],
    );

    register(
        "customButton",
        vec![
            AttributeSpec::new(
                "buttons",
                ValueKind::Array,
                json!([{
                    "title": "Click me",
                    "url": "",
                    "variant": "primary",
                    "size": "medium",
                }]),
            ),
            AttributeSpec::new("align", ValueKind::Enum(ALIGN_VALUES), json!("center")),
            AttributeSpec::new("fullWidth", ValueKind::Bool, json!(false)),
        ],
    );

    register(
        "customRelatedItem",
        vec![
            AttributeSpec::new("itemId", ValueKind::Str, json!("")),
            AttributeSpec::new("layout", ValueKind::Enum(LAYOUT_VALUES), json!("grid")),
            AttributeSpec::new("maxItems", ValueKind::Int { min: 1, max: 10 }, json!(3)),
        ],
    );

    register(
        "customBanner",
        vec![
            AttributeSpec::new("title", ValueKind::Str, json!("Banner Title")),
            AttributeSpec::new(
                "content",
                ValueKind::Str,
                json!("Banner content goes here..."),
            ),
            AttributeSpec::nullable("action", ValueKind::Object),
        ],
    );

    register(
        "customEntity",
        vec![
            AttributeSpec::new("entity_name", ValueKind::Str, json!("")),
            AttributeSpec::new("entity_id", ValueKind::Str, json!("")),
            AttributeSpec::new("custom_attrs", ValueKind::Any, json!({})),
        ],
    );

    map
});

/// Pure schema lookup by registry key.
///
/// Keys are node type names, except for custom components, which register
/// one schema per flavor (`customButton`, `customRelatedItem`,
/// `customBanner`, `customEntity`). Types with no declared attributes
/// (paragraph, blockquote, ...) have no entry.
pub fn schema_for(key: &str) -> Option<&'static AttributeSchema> {
    SCHEMAS.get(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lookup_is_total_over_declared_types() {
        for key in [
            "heading",
            "codeBlock",
            "orderedList",
            "image",
            "iframe",
            "customButton",
            "customRelatedItem",
            "customBanner",
            "customEntity",
        ] {
            assert!(schema_for(key).is_some(), "missing schema for {key}");
        }
    }

    #[test]
    fn test_unknown_type_has_no_schema() {
        assert!(schema_for("paragraph").is_none());
        assert!(schema_for("nope").is_none());
    }

    #[test]
    fn test_image_declares_exclusive_featured_flag() {
        let schema = schema_for("image").unwrap();
        let featured = schema.attribute("isFeatured").unwrap();
        assert!(featured.exclusive);
        assert_eq!(featured.default, serde_json::json!(false));

        let exclusive: Vec<_> = schema.exclusive_flags().map(|s| s.name).collect();
        assert_eq!(exclusive, vec!["isFeatured"]);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let schema = schema_for("customButton").unwrap();
        assert_eq!(
            schema.attribute_ignore_case("fullwidth").map(|s| s.name),
            Some("fullWidth")
        );
    }

    #[test]
    fn test_max_items_range() {
        let schema = schema_for("customRelatedItem").unwrap();
        match schema.attribute("maxItems").unwrap().kind {
            ValueKind::Int { min, max } => {
                assert_eq!((min, max), (1, 10));
            }
            _ => panic!("maxItems must be an integer kind"),
        }
    }
}
