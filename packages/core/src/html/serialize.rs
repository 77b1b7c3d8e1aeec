//! Structured Tree -> HTML Projection
//!
//! Deterministic mapping from normalized document nodes to `DomSpec`
//! values. Standard nodes map 1:1 to their semantic tag; images become
//! `figure > (img, figcaption)` when a caption is present and a bare `img`
//! otherwise; atomic custom components become `div` elements carrying
//! `data-custom-component="true"`, `data-type`, and one `data-*` attribute
//! per schema attribute with a non-empty value.
//!
//! The projection is the serialize half of a best-effort round trip: HTML
//! is lossier than the structured model, so parse(serialize(node)) recovers
//! the attributes with a defined DOM projection, not necessarily the whole
//! bag.

use serde_json::Value;
use tracing::warn;

use crate::html::dom::{DomChild, DomSpec};
use crate::models::{DocNode, Document, Mark};
use crate::schema::{normalize, schema_for};

/// Render a whole document to an HTML string
pub fn document_to_html(document: &Document) -> String {
    let mut out = String::new();
    for block in document.blocks() {
        if let Some(spec) = node_to_dom(block) {
            out.push_str(&spec.to_html());
        }
    }
    out
}

/// Project one node (and its subtree) onto a DOM specification.
///
/// Returns `None` for node types with no HTML representation; the caller
/// skips them.
pub fn node_to_dom(node: &DocNode) -> Option<DomSpec> {
    match node.node_type.as_str() {
        "paragraph" => Some(DomSpec::new("p").children(inline_children(node))),
        "heading" => {
            let level = node.attr_i64("level").unwrap_or(1).clamp(1, 4);
            Some(DomSpec::new(format!("h{level}")).children(inline_children(node)))
        }
        "blockquote" => Some(DomSpec::new("blockquote").children(block_children(node))),
        "codeBlock" => {
            let mut code = DomSpec::new("code");
            if let Some(language) = node.attr_str("language") {
                code = code.attr("class", format!("language-{language}"));
            }
            Some(DomSpec::new("pre").child(code.text(node.text_content())))
        }
        "bulletList" => Some(DomSpec::new("ul").children(block_children(node))),
        "orderedList" => {
            let start = node.attr_i64("start").unwrap_or(1);
            let mut list = DomSpec::new("ol");
            if start != 1 {
                list = list.attr("start", start.to_string());
            }
            Some(list.children(block_children(node)))
        }
        "listItem" => Some(DomSpec::new("li").children(block_children(node))),
        "horizontalRule" => Some(DomSpec::new("hr")),
        "hardBreak" => Some(DomSpec::new("br")),
        "text" => None, // handled by inline_children
        "image" => Some(image_to_dom(node)),
        "iframe" => Some(
            DomSpec::new("iframe")
                .attr_opt("src", node.attr_str("src"))
                .attr_opt("width", node.attr_str("width"))
                .attr_opt("height", node.attr_str("height")),
        ),
        "table" => Some(DomSpec::new("table").children(block_children(node))),
        "tableRow" => Some(DomSpec::new("tr").children(block_children(node))),
        "tableHeader" => Some(DomSpec::new("th").children(inline_children(node))),
        "tableCell" => Some(DomSpec::new("td").children(inline_children(node))),
        "customComponent" => Some(component_to_dom(node)),
        other => {
            warn!(node_type = %other, "skipping node with no HTML projection");
            None
        }
    }
}

fn block_children(node: &DocNode) -> Vec<DomChild> {
    node.content
        .iter()
        .filter_map(node_to_dom)
        .map(DomChild::Element)
        .collect()
}

fn inline_children(node: &DocNode) -> Vec<DomChild> {
    let mut children = Vec::new();
    for child in &node.content {
        match child.node_type.as_str() {
            "text" => {
                let text = child.text.clone().unwrap_or_default();
                children.push(wrap_marks(&child.marks, DomChild::Text(text)));
            }
            "hardBreak" => children.push(DomChild::Element(DomSpec::new("br"))),
            _ => {
                if let Some(spec) = node_to_dom(child) {
                    children.push(DomChild::Element(spec));
                }
            }
        }
    }
    children
}

/// Wrap a text run in its mark tags, innermost first in stored order
fn wrap_marks(marks: &[Mark], inner: DomChild) -> DomChild {
    let mut current = inner;
    for mark in marks.iter().rev() {
        let spec = match mark.mark_type.as_str() {
            "bold" => DomSpec::new("strong"),
            "italic" => DomSpec::new("em"),
            "strike" => DomSpec::new("s"),
            "underline" => DomSpec::new("u"),
            "code" => DomSpec::new("code"),
            "link" => DomSpec::new("a")
                .attr_opt("href", mark.attrs.get("href").and_then(Value::as_str))
                .attr_opt("target", mark.attrs.get("target").and_then(Value::as_str)),
            other => {
                warn!(mark_type = %other, "skipping unknown mark");
                continue;
            }
        };
        current = DomChild::Element(match current {
            DomChild::Element(element) => spec.child(element),
            DomChild::Text(text) => spec.text(text),
        });
    }
    current
}

fn image_to_dom(node: &DocNode) -> DomSpec {
    let attrs = normalize("image", &node.attrs);

    let str_attr = |key: &str| attrs.get(key).and_then(Value::as_str);
    let int_attr = |key: &str| attrs.get(key).and_then(Value::as_i64);

    let mut img = DomSpec::new("img")
        .attr_opt("src", str_attr("src"))
        .attr_opt("alt", str_attr("alt"))
        .attr_opt("title", str_attr("title"));

    // Exact pixel dimensions take precedence over the percentage width,
    // and land on the numeric width/height DOM attributes.
    let pixel_width = int_attr("pixelWidth");
    let pixel_height = int_attr("pixelHeight");
    if let Some(width) = pixel_width {
        img = img.attr("width", width.to_string());
    }
    if let Some(height) = pixel_height {
        img = img.attr("height", height.to_string());
    }
    if pixel_width.is_none() {
        if let Some(width) = str_attr("width") {
            if width != "auto" {
                img = img.attr("style", format!("width: {width}"));
            }
        }
    }
    img = img.attr_opt("srcset", str_attr("srcset"));

    match str_attr("caption") {
        Some(caption) if !caption.is_empty() => DomSpec::new("figure")
            .child(img)
            .child(DomSpec::new("figcaption").text(caption)),
        _ => img,
    }
}

fn component_to_dom(node: &DocNode) -> DomSpec {
    let attrs = normalize("customComponent", &node.attrs);
    let type_name = attrs
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("customButton")
        .to_string();

    let mut spec = DomSpec::new("div")
        .attr("data-custom-component", "true")
        .attr("data-type", &type_name);

    // One data-* attribute per declared schema attribute with a non-empty
    // value; structured values are embedded as JSON strings.
    if let Some(schema) = schema_for(&type_name) {
        for decl in &schema.attributes {
            let Some(value) = attrs.get(decl.name) else {
                continue;
            };
            let Some(rendered) = data_attr_value(value) else {
                continue;
            };
            spec = spec.attr(format!("data-{}", decl.name), rendered);
        }
    }

    // Atomic nodes own no editable child content; the content slot is empty.
    spec
}

fn data_attr_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

#[cfg(test)]
#[path = "serialize_test.rs"]
mod serialize_test;
