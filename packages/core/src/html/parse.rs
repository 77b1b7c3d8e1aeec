//! HTML -> Structured Tree Projection
//!
//! Parses an HTML fragment (paste, import, or the View/Edit HTML dialog)
//! into document nodes using html5ever, then runs every recovered attribute
//! bag through the normalizer so no partial attribute set is ever admitted
//! to the tree.
//!
//! Matching is rule-ordered: a `figure` containing an `img` is matched
//! before the bare `img` rule (so a captioned image parses as ONE node),
//! and the custom-component `div` rule accepts the current marker
//! (`data-custom-component="true"`) as well as two legacy markers
//! (`data-custom="true"`, `data-node-type="customComponent"`).
//!
//! Unknown container tags are transparent: their children are parsed in
//! place. Unknown leaf tags yield no match and are dropped.

use std::sync::LazyLock;

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::{CustomComponentType, DocNode, Document, Mark};
use crate::schema::registry::ValueKind;
use crate::schema::{normalize, schema_for};

static STYLE_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"width:\s*([^;]+)").expect("valid regex"));

/// Errors from the HTML import boundary
#[derive(Error, Debug)]
pub enum HtmlParseError {
    #[error("HTML input is empty")]
    Empty,

    #[error("HTML input yielded no recognizable content")]
    NoContent,
}

/// Parse an HTML fragment into a document.
///
/// Every recovered node is normalized before admission. Fails when the
/// input is empty or nothing in it is recognizable; the caller decides how
/// to surface that (the session leaves the live tree untouched).
pub fn html_to_document(html: &str) -> Result<Document, HtmlParseError> {
    if html.trim().is_empty() {
        return Err(HtmlParseError::Empty);
    }

    let dom = parse_fragment(html);
    let body = find_element(&dom.document, "body").ok_or(HtmlParseError::NoContent)?;

    let mut blocks = Vec::new();
    for child in body.children.borrow().iter() {
        blocks.extend(parse_block(child));
    }

    if blocks.is_empty() {
        return Err(HtmlParseError::NoContent);
    }
    Ok(Document::from_blocks(blocks))
}

/// Parse an HTML string into an rcdom tree, wrapping it in a minimal
/// document so fragment input parses predictably
fn parse_fragment(html: &str) -> RcDom {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes())
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: qname, .. } = &handle.data {
        if qname.local.as_ref() == name {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element(child, name) {
            return Some(found);
        }
    }
    None
}

fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

fn element_attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref().eq_ignore_ascii_case(name))
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn element_attrs(handle: &Handle) -> Vec<(String, String)> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| {
                (
                    attr.name.local.as_ref().to_ascii_lowercase(),
                    attr.value.to_string(),
                )
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(contents.borrow().as_ref());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Parse one DOM node in block position into zero or more block nodes
fn parse_block(handle: &Handle) -> Vec<DocNode> {
    if let NodeData::Text { contents } = &handle.data {
        // Stray block-level text becomes a paragraph; whitespace between
        // elements is ignored.
        let text = contents.borrow().to_string();
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![DocNode::with_content(
            "paragraph",
            vec![DocNode::text(text.trim().to_string())],
        )];
    }

    let Some(tag) = element_name(handle) else {
        return Vec::new();
    };

    // The figure rule must run before the bare img rule so a captioned
    // image yields one node, not two.
    if tag == "figure" {
        if let Some(node) = parse_figure(handle) {
            return vec![node];
        }
        return parse_transparent(handle);
    }

    if tag == "div" {
        if let Some(node) = parse_custom_component(handle) {
            return vec![node];
        }
        return parse_transparent(handle);
    }

    match tag.as_str() {
        "img" => parse_image(handle, None).into_iter().collect(),
        "iframe" => vec![parse_iframe(handle)],
        "p" => parse_paragraph(handle),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level: i64 = tag[1..].parse().unwrap_or(1);
            let mut attrs = Map::new();
            attrs.insert("level".to_string(), Value::Number(Number::from(level)));
            let mut node = DocNode::new("heading", normalize("heading", &attrs));
            node.content = parse_inline_children(handle);
            vec![node]
        }
        "blockquote" => {
            let mut children = Vec::new();
            for child in handle.children.borrow().iter() {
                children.extend(parse_block(child));
            }
            vec![DocNode::with_content("blockquote", children)]
        }
        "pre" => vec![parse_code_block(handle)],
        "ul" => vec![DocNode::with_content("bulletList", parse_list_items(handle))],
        "ol" => {
            let mut attrs = Map::new();
            if let Some(start) = element_attr(handle, "start") {
                attrs.insert("start".to_string(), Value::String(start));
            }
            let mut node = DocNode::new("orderedList", normalize("orderedList", &attrs));
            node.content = parse_list_items(handle);
            vec![node]
        }
        "hr" => vec![DocNode::with_content("horizontalRule", Vec::new())],
        "table" => vec![DocNode::with_content("table", parse_table_rows(handle))],
        // Transparent containers: parse children in place
        "section" | "article" | "main" | "span" | "tbody" | "thead" | "tfoot" => {
            parse_transparent(handle)
        }
        _ => {
            warn!(tag = %tag, "unrecognized tag yielded no match");
            Vec::new()
        }
    }
}

fn parse_transparent(handle: &Handle) -> Vec<DocNode> {
    let mut blocks = Vec::new();
    for child in handle.children.borrow().iter() {
        blocks.extend(parse_block(child));
    }
    if !blocks.is_empty() {
        return blocks;
    }
    // No block structure inside; salvage inline content as a paragraph.
    let inline = parse_inline_children(handle);
    if inline.is_empty() {
        Vec::new()
    } else {
        vec![DocNode::with_content("paragraph", inline)]
    }
}

fn parse_paragraph(handle: &Handle) -> Vec<DocNode> {
    // Images nested in paragraphs are hoisted to block level; everything
    // else stays inline.
    let mut images = Vec::new();
    let mut inline = Vec::new();
    for child in handle.children.borrow().iter() {
        if element_name(child).as_deref() == Some("img") {
            images.extend(parse_image(child, None));
        } else {
            parse_inline(child, &[], &mut inline);
        }
    }

    let mut blocks = Vec::new();
    if !inline.is_empty() {
        blocks.push(DocNode::with_content("paragraph", inline));
    }
    blocks.extend(images);
    if blocks.is_empty() {
        // Preserve intentionally empty paragraphs
        blocks.push(DocNode::with_content("paragraph", Vec::new()));
    }
    blocks
}

fn parse_figure(handle: &Handle) -> Option<DocNode> {
    let img = find_element(handle, "img")?;
    let caption = find_element(handle, "figcaption").map(|el| text_content(&el).trim().to_string());
    parse_image(&img, caption.filter(|c| !c.is_empty()))
}

fn parse_image(handle: &Handle, caption: Option<String>) -> Option<DocNode> {
    let src = element_attr(handle, "src")?;
    let mut attrs = Map::new();
    attrs.insert("src".to_string(), Value::String(src));

    if let Some(alt) = element_attr(handle, "alt") {
        attrs.insert("alt".to_string(), Value::String(alt));
    }
    if let Some(title) = element_attr(handle, "title") {
        attrs.insert("title".to_string(), Value::String(title));
    }
    if let Some(srcset) = element_attr(handle, "srcset") {
        attrs.insert("srcset".to_string(), Value::String(srcset));
    }

    // Numeric width/height DOM attributes map back to pixel dimensions,
    // but only when they are valid non-negative integers.
    if let Some(width) = element_attr(handle, "width").and_then(parse_dimension) {
        attrs.insert("pixelWidth".to_string(), Value::Number(Number::from(width)));
    }
    if let Some(height) = element_attr(handle, "height").and_then(parse_dimension) {
        attrs.insert(
            "pixelHeight".to_string(),
            Value::Number(Number::from(height)),
        );
    }

    // A width in the inline style recovers the percentage width.
    if let Some(style) = element_attr(handle, "style") {
        if let Some(caps) = STYLE_WIDTH_RE.captures(&style) {
            attrs.insert(
                "width".to_string(),
                Value::String(caps[1].trim().to_string()),
            );
        }
    }

    match caption {
        Some(caption) => {
            attrs.insert("caption".to_string(), Value::String(caption));
        }
        None => {
            attrs.insert("caption".to_string(), Value::Null);
        }
    }

    Some(DocNode::new("image", normalize("image", &attrs)))
}

fn parse_dimension(raw: String) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('-') {
        return None;
    }
    raw.parse::<u64>().ok()
}

fn parse_iframe(handle: &Handle) -> DocNode {
    let mut attrs = Map::new();
    for key in ["src", "width", "height"] {
        if let Some(value) = element_attr(handle, key) {
            attrs.insert(key.to_string(), Value::String(value));
        }
    }
    DocNode::new("iframe", normalize("iframe", &attrs))
}

fn parse_code_block(handle: &Handle) -> DocNode {
    let code = find_element(handle, "code");
    let mut attrs = Map::new();
    if let Some(code) = &code {
        if let Some(class) = element_attr(code, "class") {
            if let Some(language) = class
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
            {
                attrs.insert("language".to_string(), Value::String(language.to_string()));
            }
        }
    }

    let source = code.as_ref().unwrap_or(handle);
    let text = text_content(source);
    let content = if text.is_empty() {
        Vec::new()
    } else {
        vec![DocNode::text(text)]
    };

    let mut node = DocNode::new("codeBlock", normalize("codeBlock", &attrs));
    node.content = content;
    node
}

fn parse_list_items(handle: &Handle) -> Vec<DocNode> {
    let mut items = Vec::new();
    for child in handle.children.borrow().iter() {
        if element_name(child).as_deref() != Some("li") {
            continue;
        }
        let mut blocks = Vec::new();
        for grandchild in child.children.borrow().iter() {
            blocks.extend(parse_block(grandchild));
        }
        if blocks.is_empty() {
            // List items with bare inline content get an implicit paragraph
            let inline = parse_inline_children(child);
            blocks.push(DocNode::with_content("paragraph", inline));
        }
        items.push(DocNode::with_content("listItem", blocks));
    }
    items
}

fn parse_table_rows(handle: &Handle) -> Vec<DocNode> {
    let mut rows = Vec::new();
    for child in handle.children.borrow().iter() {
        match element_name(child).as_deref() {
            Some("tr") => rows.push(parse_table_row(child)),
            Some("thead") | Some("tbody") | Some("tfoot") => {
                rows.extend(parse_table_rows(child));
            }
            _ => {}
        }
    }
    rows
}

fn parse_table_row(handle: &Handle) -> DocNode {
    let mut cells = Vec::new();
    for child in handle.children.borrow().iter() {
        let cell_type = match element_name(child).as_deref() {
            Some("th") => "tableHeader",
            Some("td") => "tableCell",
            _ => continue,
        };
        cells.push(DocNode::with_content(
            cell_type,
            parse_inline_children(child),
        ));
    }
    DocNode::with_content("tableRow", cells)
}

/// Custom-component div markers, current and legacy
fn component_type_of(handle: &Handle) -> Option<String> {
    let is_component = element_attr(handle, "data-custom-component").as_deref() == Some("true")
        || element_attr(handle, "data-custom").as_deref() == Some("true")
        || element_attr(handle, "data-node-type").as_deref() == Some("customComponent");
    if !is_component {
        return None;
    }
    element_attr(handle, "data-type")
        .or_else(|| element_attr(handle, "data-component-type"))
        .or_else(|| Some("customButton".to_string()))
}

fn parse_custom_component(handle: &Handle) -> Option<DocNode> {
    let type_name = component_type_of(handle)?;
    // Legacy type names resolve to their canonical flavor before the schema
    // lookup; otherwise their data-* attributes lose their declared names.
    let schema = CustomComponentType::parse(&type_name)
        .map(|flavor| flavor.name())
        .and_then(schema_for);

    let mut attrs = Map::new();
    attrs.insert("type".to_string(), Value::String(type_name.clone()));

    for (name, value) in element_attrs(handle) {
        let Some(key) = name.strip_prefix("data-") else {
            continue;
        };
        if matches!(
            key,
            "custom-component" | "custom" | "node-type" | "type" | "component-type"
        ) {
            continue;
        }

        // HTML lowercases attribute names; recover the declared camelCase
        // spelling from the schema when there is one.
        let (attr_name, kind) = match schema.and_then(|s| s.attribute_ignore_case(key)) {
            Some(spec) => (spec.name.to_string(), Some(spec.kind.clone())),
            None => (key.to_string(), None),
        };
        attrs.insert(attr_name, decode_data_value(&value, kind.as_ref()));
    }

    Some(DocNode::new(
        "customComponent",
        normalize("customComponent", &attrs),
    ))
}

/// Decode a data-* attribute string into the declared value shape
fn decode_data_value(raw: &str, kind: Option<&ValueKind>) -> Value {
    match kind {
        Some(ValueKind::Array) | Some(ValueKind::Object) | Some(ValueKind::Any) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        Some(ValueKind::Int { .. }) => raw
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(Number::from(n)))
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some(ValueKind::Float) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        Some(ValueKind::Bool) => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        _ => {
            // No declaration: embedded JSON still decodes structurally
            if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

fn parse_inline_children(handle: &Handle) -> Vec<DocNode> {
    let mut out = Vec::new();
    for child in handle.children.borrow().iter() {
        parse_inline(child, &[], &mut out);
    }
    out
}

fn parse_inline(handle: &Handle, marks: &[Mark], out: &mut Vec<DocNode>) {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            // Drop formatting whitespace but keep meaningful spaces
            if text.trim().is_empty() && text.contains('\n') {
                return;
            }
            if !text.is_empty() {
                out.push(DocNode::marked_text(text, marks.to_vec()));
            }
        }
        NodeData::Element { .. } => {
            let tag = element_name(handle).unwrap_or_default();
            let added = match tag.as_str() {
                "br" => {
                    out.push(DocNode::with_content("hardBreak", Vec::new()));
                    return;
                }
                "strong" | "b" => Some(Mark::new("bold")),
                "em" | "i" => Some(Mark::new("italic")),
                "s" | "del" | "strike" => Some(Mark::new("strike")),
                "u" => Some(Mark::new("underline")),
                "code" => Some(Mark::new("code")),
                "a" => {
                    let mut mark = Mark::link(element_attr(handle, "href").unwrap_or_default());
                    if let Some(target) = element_attr(handle, "target") {
                        mark.attrs
                            .insert("target".to_string(), Value::String(target));
                    }
                    Some(mark)
                }
                // Unknown inline tags are transparent
                _ => None,
            };

            let mut inner = marks.to_vec();
            if let Some(mark) = added {
                inner.push(mark);
            }
            for child in handle.children.borrow().iter() {
                parse_inline(child, &inner, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod parse_test;
