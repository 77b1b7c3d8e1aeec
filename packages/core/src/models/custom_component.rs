//! Typed Custom Component Attributes
//!
//! Custom components are atomic block nodes carried by the shared
//! `customComponent` node type. The concrete flavor lives in the `type`
//! attribute; this module gives each flavor a typed attribute struct and a
//! tagged union over all of them, replacing the loose one-bag-for-all-types
//! attribute shape the editor stores on disk.
//!
//! Two persisted legacy shapes are migrated here (never supported as live
//! variants):
//!
//! - the `customRelatedPost` type name (renamed to `customRelatedItem`)
//! - the flat single-button shape (`{title, variant, size, url}` at the top
//!   level) and the flat banner shape (`bannerTitle`, `theme`, `closable`),
//!   both predating the button-array / action-object revisions
//!
//! # Examples
//!
//! ```rust
//! use richdoc_core::models::{CustomComponentAttrs, CustomComponentType};
//! use serde_json::json;
//!
//! let bag = json!({
//!     "type": "customButton",
//!     "buttons": [{ "title": "Go", "url": "", "variant": "primary", "size": "medium" }],
//!     "align": "center",
//!     "fullWidth": false,
//! });
//! let attrs = CustomComponentAttrs::from_bag(bag.as_object().unwrap()).unwrap();
//! assert_eq!(attrs.component_type(), CustomComponentType::Button);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::ValidationError;

/// Closed set of custom component flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomComponentType {
    #[serde(rename = "customButton")]
    Button,
    #[serde(rename = "customRelatedItem")]
    RelatedItem,
    #[serde(rename = "customBanner")]
    Banner,
    #[serde(rename = "customEntity")]
    Entity,
}

impl CustomComponentType {
    /// Parse a wire-format component type name.
    ///
    /// Accepts the legacy `customRelatedPost` spelling as `RelatedItem`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "customButton" => Some(Self::Button),
            "customRelatedItem" => Some(Self::RelatedItem),
            // Legacy revision of the same feature
            "customRelatedPost" => Some(Self::RelatedItem),
            "customBanner" => Some(Self::Banner),
            "customEntity" => Some(Self::Entity),
            _ => None,
        }
    }

    /// Canonical wire-format name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Button => "customButton",
            Self::RelatedItem => "customRelatedItem",
            Self::Banner => "customBanner",
            Self::Entity => "customEntity",
        }
    }
}

/// Visual variant of a button entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
}

/// Size of a button entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Horizontal alignment of a block-level component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// Layout of the related-item listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedLayout {
    #[default]
    Grid,
    List,
}

/// One entry in a button group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub variant: ButtonVariant,
    #[serde(default)]
    pub size: ButtonSize,
}

impl Default for ButtonItem {
    fn default() -> Self {
        Self {
            title: "Click me".to_string(),
            url: String::new(),
            variant: ButtonVariant::Primary,
            size: ButtonSize::Medium,
        }
    }
}

/// Attributes of the `customButton` component.
///
/// `buttons` is never empty after normalization (it defaults to one entry);
/// rendering hosts must still tolerate an empty list by showing a
/// placeholder, since partial updates can clear it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomButtonAttrs {
    #[serde(default = "default_buttons")]
    pub buttons: Vec<ButtonItem>,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub full_width: bool,
}

fn default_buttons() -> Vec<ButtonItem> {
    vec![ButtonItem::default()]
}

impl Default for CustomButtonAttrs {
    fn default() -> Self {
        Self {
            buttons: default_buttons(),
            align: Align::Center,
            full_width: false,
        }
    }
}

/// Attributes of the `customRelatedItem` component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRelatedItemAttrs {
    /// Comma-separated id list, e.g. `"12,34,56"`
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub layout: RelatedLayout,
    #[serde(default = "default_max_items")]
    pub max_items: i64,
}

fn default_max_items() -> i64 {
    3
}

impl Default for CustomRelatedItemAttrs {
    fn default() -> Self {
        Self {
            item_id: String::new(),
            layout: RelatedLayout::Grid,
            max_items: default_max_items(),
        }
    }
}

impl CustomRelatedItemAttrs {
    /// Parsed id list (trimmed, empty entries dropped)
    pub fn item_ids(&self) -> Vec<&str> {
        self.item_id
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// Optional call-to-action of a banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerAction {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: String,
}

/// Attributes of the `customBanner` component.
///
/// `action` is genuinely nullable: the editor can remove it, and a null
/// value survives normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBannerAttrs {
    #[serde(default = "default_banner_title")]
    pub title: String,
    #[serde(default = "default_banner_content")]
    pub content: String,
    #[serde(default)]
    pub action: Option<BannerAction>,
}

fn default_banner_title() -> String {
    "Banner Title".to_string()
}

fn default_banner_content() -> String {
    "Banner content goes here...".to_string()
}

impl Default for CustomBannerAttrs {
    fn default() -> Self {
        Self {
            title: default_banner_title(),
            content: default_banner_content(),
            action: None,
        }
    }
}

/// Attributes of the `customEntity` component.
///
/// `custom_attrs` is an open bag that passes through schema normalization
/// untouched; it exists for forward compatibility with entity renderers the
/// core does not know about.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomEntityAttrs {
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub custom_attrs: Map<String, Value>,
}

/// Tagged union over every custom component flavor
#[derive(Debug, Clone, PartialEq)]
pub enum CustomComponentAttrs {
    Button(CustomButtonAttrs),
    RelatedItem(CustomRelatedItemAttrs),
    Banner(CustomBannerAttrs),
    Entity(CustomEntityAttrs),
}

impl CustomComponentAttrs {
    /// The flavor of this attribute set
    pub fn component_type(&self) -> CustomComponentType {
        match self {
            Self::Button(_) => CustomComponentType::Button,
            Self::RelatedItem(_) => CustomComponentType::RelatedItem,
            Self::Banner(_) => CustomComponentType::Banner,
            Self::Entity(_) => CustomComponentType::Entity,
        }
    }

    /// Schema-default attribute set for a flavor
    pub fn defaults(component_type: CustomComponentType) -> Self {
        match component_type {
            CustomComponentType::Button => Self::Button(CustomButtonAttrs::default()),
            CustomComponentType::RelatedItem => Self::RelatedItem(CustomRelatedItemAttrs::default()),
            CustomComponentType::Banner => Self::Banner(CustomBannerAttrs::default()),
            CustomComponentType::Entity => Self::Entity(CustomEntityAttrs::default()),
        }
    }

    /// Decode a typed view from a raw attribute bag.
    ///
    /// The bag must carry a `type` key; legacy shapes are migrated first.
    /// Fields that fail to decode fall back to their defaults (lenient
    /// policy: persisted history may predate the current schema).
    pub fn from_bag(bag: &Map<String, Value>) -> Result<Self, ValidationError> {
        let bag = migrate_component_bag(bag.clone());

        let type_name = bag
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ValidationError::InvalidNodeType("<missing type>".to_string()))?;

        let component_type = CustomComponentType::parse(type_name)
            .ok_or_else(|| ValidationError::InvalidNodeType(type_name.to_string()))?;

        let value = Value::Object(bag);
        let attrs = match component_type {
            CustomComponentType::Button => serde_json::from_value(value)
                .map(Self::Button)
                .unwrap_or_else(|_| Self::Button(CustomButtonAttrs::default())),
            CustomComponentType::RelatedItem => serde_json::from_value(value)
                .map(Self::RelatedItem)
                .unwrap_or_else(|_| Self::RelatedItem(CustomRelatedItemAttrs::default())),
            CustomComponentType::Banner => serde_json::from_value(value)
                .map(Self::Banner)
                .unwrap_or_else(|_| Self::Banner(CustomBannerAttrs::default())),
            CustomComponentType::Entity => serde_json::from_value(value)
                .map(Self::Entity)
                .unwrap_or_else(|_| Self::Entity(CustomEntityAttrs::default())),
        };

        Ok(attrs)
    }

    /// Encode back to a raw attribute bag, including the `type` key
    pub fn to_bag(&self) -> Map<String, Value> {
        let value = match self {
            Self::Button(attrs) => serde_json::to_value(attrs),
            Self::RelatedItem(attrs) => serde_json::to_value(attrs),
            Self::Banner(attrs) => serde_json::to_value(attrs),
            Self::Entity(attrs) => serde_json::to_value(attrs),
        };

        let mut bag = match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        bag.insert(
            "type".to_string(),
            Value::String(self.component_type().name().to_string()),
        );
        bag
    }
}

/// Migrate a persisted custom-component attribute bag to the canonical
/// (latest-revision) shape. Idempotent: a canonical bag passes through
/// unchanged.
pub fn migrate_component_bag(mut bag: Map<String, Value>) -> Map<String, Value> {
    // 1. Type rename: customRelatedPost -> customRelatedItem
    if bag.get("type").and_then(Value::as_str) == Some("customRelatedPost") {
        warn!("migrating legacy customRelatedPost component to customRelatedItem");
        bag.insert(
            "type".to_string(),
            Value::String("customRelatedItem".to_string()),
        );
    }

    match bag.get("type").and_then(Value::as_str) {
        // 2. Flat single-button shape -> one-element buttons array
        Some("customButton") => {
            let has_flat_shape = !bag.contains_key("buttons")
                && (bag.contains_key("title")
                    || bag.contains_key("variant")
                    || bag.contains_key("size")
                    || bag.contains_key("url"));
            if has_flat_shape {
                warn!("migrating legacy flat customButton shape to buttons array");
                let mut item = Map::new();
                for key in ["title", "url", "variant", "size"] {
                    if let Some(value) = bag.remove(key) {
                        item.insert(key.to_string(), value);
                    }
                }
                bag.insert(
                    "buttons".to_string(),
                    Value::Array(vec![Value::Object(item)]),
                );
            }
        }

        // 3. Flat banner shape: bannerTitle key plus theme/closable extras
        Some("customBanner") => {
            if let Some(title) = bag.remove("bannerTitle") {
                warn!("migrating legacy customBanner shape (bannerTitle/theme/closable)");
                bag.entry("title".to_string()).or_insert(title);
            }
            for dropped in ["theme", "closable"] {
                if bag.remove(dropped).is_some() {
                    warn!(attribute = dropped, "dropping legacy customBanner attribute");
                }
            }
        }

        // 4. Legacy carousel layout collapses to grid
        Some("customRelatedItem") => {
            if bag.get("layout").and_then(Value::as_str) == Some("carousel") {
                warn!("migrating legacy carousel layout to grid");
                bag.insert("layout".to_string(), Value::String("grid".to_string()));
            }
        }

        _ => {}
    }

    bag
}

#[cfg(test)]
#[path = "custom_component_test.rs"]
mod custom_component_test;
