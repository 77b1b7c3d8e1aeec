//! Typed Image Attributes
//!
//! Image nodes carry the richest attribute set in the document model:
//! source and description, display width (a CSS-ish string), optional exact
//! pixel dimensions, alignment, object-fit, responsive hints, and the
//! document-wide exclusive `isFeatured` flag.
//!
//! The typed view here is a convenience layer over the raw attribute bag;
//! the normalizer guarantees that every image bag is complete before the
//! typed view decodes it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::custom_component::Align;
use crate::models::ValidationError;

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)%$").expect("valid regex"));
static PIXEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:px)?$").expect("valid regex"));

/// Display width of an image: a percentage of the container, an exact pixel
/// count, or one of the CSS keywords the editor uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageWidth {
    Percent(f64),
    Px(u32),
    Auto,
    FitContent,
}

impl ImageWidth {
    /// Parse a persisted width string. Bare numbers count as pixels (the
    /// resize handle writes them that way).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw {
            "auto" => return Some(Self::Auto),
            "fit-content" => return Some(Self::FitContent),
            _ => {}
        }
        if let Some(caps) = PERCENT_RE.captures(raw) {
            return caps[1].parse().ok().map(Self::Percent);
        }
        if let Some(caps) = PIXEL_RE.captures(raw) {
            return caps[1].parse().ok().map(Self::Px);
        }
        None
    }
}

impl fmt::Display for ImageWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(pct) => write!(f, "{}%", pct),
            Self::Px(px) => write!(f, "{}px", px),
            Self::Auto => f.write_str("auto"),
            Self::FitContent => f.write_str("fit-content"),
        }
    }
}

/// How the image fills its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

/// Typed view of a normalized image attribute bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Display width string; see [`ImageWidth::parse`]
    #[serde(default = "default_width")]
    pub width: String,
    #[serde(default)]
    pub pixel_width: Option<u32>,
    #[serde(default)]
    pub pixel_height: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default = "default_align")]
    pub align: Align,
    #[serde(default)]
    pub object_fit: ObjectFit,
    #[serde(default = "default_mobile_width")]
    pub mobile_width: String,
    #[serde(default = "default_use_responsive")]
    pub use_responsive: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub srcset: Option<String>,
}

fn default_width() -> String {
    "90%".to_string()
}

fn default_align() -> Align {
    Align::Center
}

fn default_mobile_width() -> String {
    "100%".to_string()
}

fn default_use_responsive() -> bool {
    true
}

impl Default for ImageAttrs {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            title: None,
            caption: None,
            width: default_width(),
            pixel_width: None,
            pixel_height: None,
            aspect_ratio: None,
            align: default_align(),
            object_fit: ObjectFit::Contain,
            mobile_width: default_mobile_width(),
            use_responsive: default_use_responsive(),
            is_featured: false,
            srcset: None,
        }
    }
}

impl ImageAttrs {
    /// Decode a typed view from a (normalized) attribute bag
    pub fn from_bag(bag: &Map<String, Value>) -> Result<Self, ValidationError> {
        serde_json::from_value(Value::Object(bag.clone())).map_err(|err| {
            ValidationError::InvalidAttribute {
                node_type: "image".to_string(),
                attribute: "<bag>".to_string(),
                reason: err.to_string(),
            }
        })
    }

    /// Encode back to a raw attribute bag
    pub fn to_bag(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Parsed display width; `None` when the persisted string is garbage
    pub fn display_width(&self) -> Option<ImageWidth> {
        ImageWidth::parse(&self.width)
    }
}
