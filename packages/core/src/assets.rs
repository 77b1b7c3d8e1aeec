//! Asset Resolution
//!
//! The seam between the document model and the host's media library. The
//! core never fetches anything itself; hosts implement [`AssetResolver`]
//! and the insert path turns a resolved asset into a normalized image
//! attribute bag, including a `srcset` built from the asset's format
//! variants.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::schema::normalize;

/// Errors from host-side asset resolution
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset '{id}' is not an image: {mime_type}")]
    NotAnImage { id: String, mime_type: String },

    #[error("Asset resolution failed: {0}")]
    Resolution(String),
}

/// One pre-scaled rendition of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatVariant {
    pub url: String,
    /// Rendition width in pixels (the `w` descriptor in `srcset`)
    pub width: u32,
}

/// An asset resolved by the host's media library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Pre-scaled renditions, any order; `srcset` sorts them by width
    #[serde(default)]
    pub format_variants: Vec<FormatVariant>,
}

impl ResolvedAsset {
    /// The `srcset` value for this asset, or `None` without variants
    pub fn srcset(&self) -> Option<String> {
        if self.format_variants.is_empty() {
            return None;
        }
        let mut variants = self.format_variants.clone();
        variants.sort_by_key(|variant| variant.width);
        Some(
            variants
                .iter()
                .map(|variant| format!("{} {}w", variant.url, variant.width))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Host-implemented lookup from an asset id to its resolved form
pub trait AssetResolver {
    fn resolve(&self, asset_id: &str) -> Result<ResolvedAsset, AssetError>;
}

/// Build a normalized image attribute bag from a resolved asset.
///
/// Alt text falls back to the asset name; intrinsic dimensions land on the
/// pixel attributes so the serialized `img` carries them.
pub fn image_attrs_from_asset(asset: &ResolvedAsset) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("src".to_string(), Value::String(asset.url.clone()));

    let alt = if asset.alt_text.is_empty() {
        asset.name.clone()
    } else {
        asset.alt_text.clone()
    };
    attrs.insert("alt".to_string(), Value::String(alt));

    if let Some(width) = asset.width {
        attrs.insert(
            "pixelWidth".to_string(),
            Value::Number(Number::from(width)),
        );
    }
    if let Some(height) = asset.height {
        attrs.insert(
            "pixelHeight".to_string(),
            Value::Number(Number::from(height)),
        );
    }
    if let Some(srcset) = asset.srcset() {
        attrs.insert("srcset".to_string(), Value::String(srcset));
    }

    normalize("image", &attrs)
}
