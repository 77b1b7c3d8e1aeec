//! DOM Specification Intermediate
//!
//! The serializer does not build an html5ever tree; it emits a small
//! `DomSpec` value (tag name + ordered attribute list + children) that
//! renders to a deterministic, minimal HTML string. Attributes with empty
//! values are omitted at construction time, so the output never carries
//! `data-foo=""` noise.

use std::fmt::Write;

/// Child of a DOM element: a nested element or a text run
#[derive(Debug, Clone, PartialEq)]
pub enum DomChild {
    Element(DomSpec),
    Text(String),
}

/// A DOM element specification: tag, attributes, children
#[derive(Debug, Clone, PartialEq)]
pub struct DomSpec {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<DomChild>,
}

/// Tags serialized without a closing tag
const VOID_TAGS: &[&str] = &["img", "hr", "br"];

impl DomSpec {
    /// Create an element with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute, skipping empty values entirely
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.attrs.push((name.into(), value));
        }
        self
    }

    /// Append an attribute only when a value is present and non-empty
    pub fn attr_opt(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.attr(name, value),
            _ => self,
        }
    }

    /// Append a child element
    pub fn child(mut self, child: DomSpec) -> Self {
        self.children.push(DomChild::Element(child));
        self
    }

    /// Append a text child
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DomChild::Text(text.into()));
        self
    }

    /// Append pre-built children
    pub fn children(mut self, children: Vec<DomChild>) -> Self {
        self.children.extend(children);
        self
    }

    /// Render this element (and its subtree) to an HTML string
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }

        if VOID_TAGS.contains(&self.tag.as_str()) {
            out.push_str(">");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                DomChild::Element(element) => element.write_to(out),
                DomChild::Text(text) => out.push_str(&escape_text(text)),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape text content for HTML
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value for double-quoted position
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_attributes_are_omitted() {
        let spec = DomSpec::new("img").attr("src", "a.jpg").attr("alt", "");
        assert_eq!(spec.to_html(), r#"<img src="a.jpg">"#);
    }

    #[test]
    fn test_void_tags_have_no_closing_tag() {
        assert_eq!(DomSpec::new("hr").to_html(), "<hr>");
        assert_eq!(DomSpec::new("br").to_html(), "<br>");
    }

    #[test]
    fn test_nested_elements_and_text() {
        let spec = DomSpec::new("p")
            .child(DomSpec::new("strong").text("bold"))
            .text(" & more");
        assert_eq!(spec.to_html(), "<p><strong>bold</strong> &amp; more</p>");
    }

    #[test]
    fn test_attribute_escaping() {
        let spec = DomSpec::new("a").attr("href", r#"https://e.com/?q="x"&y=1"#);
        assert_eq!(
            spec.to_html(),
            r#"<a href="https://e.com/?q=&quot;x&quot;&amp;y=1"></a>"#
        );
    }
}
