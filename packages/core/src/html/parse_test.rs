//! Tests for the HTML -> tree projection

#[cfg(test)]
mod tests {
    use crate::html::parse::{html_to_document, HtmlParseError};
    use crate::html::serialize::document_to_html;
    use crate::models::{DocNode, Document};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map, Value};

    fn bag(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    fn parse_one(html: &str) -> DocNode {
        let doc = html_to_document(html).expect("parse");
        assert_eq!(doc.blocks().len(), 1, "expected one block from {html}");
        doc.blocks()[0].clone()
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(html_to_document(""), Err(HtmlParseError::Empty)));
        assert!(matches!(
            html_to_document("   \n\t "),
            Err(HtmlParseError::Empty)
        ));
    }

    #[test]
    fn test_unusable_input_is_malformed() {
        assert!(matches!(
            html_to_document("<unknowntag></unknowntag>"),
            Err(HtmlParseError::NoContent)
        ));
    }

    #[test]
    fn test_paragraph_with_marks() {
        let node = parse_one("<p>plain <strong>bold</strong> and <em>italic</em></p>");
        assert_eq!(node.node_type, "paragraph");
        assert_eq!(node.content.len(), 4);
        assert_eq!(node.content[1].marks[0].mark_type, "bold");
        assert_eq!(node.content[3].marks[0].mark_type, "italic");
    }

    #[test]
    fn test_legacy_mark_tags() {
        let node = parse_one("<p><b>b</b><i>i</i><del>d</del><u>u</u></p>");
        let marks: Vec<_> = node
            .content
            .iter()
            .map(|run| run.marks[0].mark_type.as_str())
            .collect();
        assert_eq!(marks, vec!["bold", "italic", "strike", "underline"]);
    }

    #[test]
    fn test_nested_marks_accumulate() {
        let node = parse_one("<p><strong><em>both</em></strong></p>");
        let run = &node.content[0];
        assert_eq!(run.marks.len(), 2);
        assert_eq!(run.marks[0].mark_type, "bold");
        assert_eq!(run.marks[1].mark_type, "italic");
    }

    #[test]
    fn test_link_mark_recovers_href_and_target() {
        let node = parse_one(r#"<p><a href="https://e.com" target="_blank">go</a></p>"#);
        let mark = &node.content[0].marks[0];
        assert_eq!(mark.mark_type, "link");
        assert_eq!(mark.attrs["href"], json!("https://e.com"));
        assert_eq!(mark.attrs["target"], json!("_blank"));
    }

    #[test]
    fn test_heading_levels_clamp() {
        assert_eq!(parse_one("<h2>t</h2>").attrs["level"], json!(2));
        // h5/h6 clamp into the supported range
        assert_eq!(parse_one("<h6>t</h6>").attrs["level"], json!(4));
    }

    #[test]
    fn test_figure_wins_over_bare_img() {
        let node = parse_one(
            r#"<figure><img src="a.jpg" alt="A"><figcaption>The caption</figcaption></figure>"#,
        );
        assert_eq!(node.node_type, "image");
        assert_eq!(node.attrs["src"], json!("a.jpg"));
        assert_eq!(node.attrs["caption"], json!("The caption"));
    }

    #[test]
    fn test_figure_without_caption_still_one_image() {
        let node = parse_one(r#"<figure><img src="a.jpg"></figure>"#);
        assert_eq!(node.node_type, "image");
        assert_eq!(node.attrs["caption"], Value::Null);
    }

    #[test]
    fn test_bare_img_gets_default_bundle() {
        let node = parse_one(r#"<img src="legacy.jpg">"#);
        assert_eq!(node.node_type, "image");
        assert_eq!(node.attrs["width"], json!("90%"));
        assert_eq!(node.attrs["align"], json!("center"));
        assert_eq!(node.attrs["useResponsive"], json!(true));
        assert_eq!(node.attrs["isFeatured"], json!(false));
    }

    #[test]
    fn test_img_numeric_dimensions_become_pixel_attrs() {
        let node = parse_one(r#"<img src="a.jpg" width="640" height="480">"#);
        assert_eq!(node.attrs["pixelWidth"], json!(640));
        assert_eq!(node.attrs["pixelHeight"], json!(480));
    }

    #[test]
    fn test_img_invalid_dimensions_are_ignored() {
        let node = parse_one(r#"<img src="a.jpg" width="wide" height="-3">"#);
        assert_eq!(node.attrs["pixelWidth"], Value::Null);
        assert_eq!(node.attrs["pixelHeight"], Value::Null);
    }

    #[test]
    fn test_img_style_width_recovers_percentage() {
        let node = parse_one(r#"<img src="a.jpg" style="width: 50%; float: left">"#);
        assert_eq!(node.attrs["width"], json!("50%"));
    }

    #[test]
    fn test_img_inside_paragraph_is_hoisted() {
        let doc = html_to_document(r#"<p>before <img src="a.jpg"></p>"#).expect("parse");
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[0].node_type, "paragraph");
        assert_eq!(doc.blocks()[1].node_type, "image");
    }

    #[test]
    fn test_custom_component_div() {
        let node = parse_one(
            r#"<div data-custom-component="true" data-type="customRelatedItem"
                data-itemid="1,2,3" data-layout="list" data-maxitems="5"></div>"#,
        );
        assert_eq!(node.node_type, "customComponent");
        assert_eq!(node.attrs["type"], json!("customRelatedItem"));
        // Lowercased data-* names map back to the declared camelCase
        assert_eq!(node.attrs["itemId"], json!("1,2,3"));
        assert_eq!(node.attrs["layout"], json!("list"));
        assert_eq!(node.attrs["maxItems"], json!(5));
    }

    #[test]
    fn test_custom_component_json_attrs_decode() {
        let node = parse_one(
            r#"<div data-custom-component="true" data-type="customButton"
                data-buttons='[{"title":"Buy","url":"https://e.com","variant":"outline","size":"large"}]'
                data-fullwidth="true"></div>"#,
        );
        let buttons = node.attrs["buttons"].as_array().expect("array");
        assert_eq!(buttons[0]["title"], json!("Buy"));
        assert_eq!(buttons[0]["variant"], json!("outline"));
        assert_eq!(node.attrs["fullWidth"], json!(true));
    }

    #[test]
    fn test_legacy_component_markers() {
        let node = parse_one(
            r#"<div data-custom="true" data-component-type="customBanner"
                data-title="Sale"></div>"#,
        );
        assert_eq!(node.node_type, "customComponent");
        assert_eq!(node.attrs["type"], json!("customBanner"));
        assert_eq!(node.attrs["title"], json!("Sale"));

        let node = parse_one(
            r#"<div data-node-type="customComponent" data-type="customEntity"
                data-entity_name="product" data-entity_id="42"></div>"#,
        );
        assert_eq!(node.attrs["entity_name"], json!("product"));
        assert_eq!(node.attrs["entity_id"], json!("42"));
    }

    #[test]
    fn test_renamed_component_type_migrates_on_parse() {
        let node = parse_one(
            r#"<div data-custom-component="true" data-type="customRelatedPost"
                data-itemid="9" data-maxitems="5"></div>"#,
        );
        assert_eq!(node.attrs["type"], json!("customRelatedItem"));
        // The legacy type name still resolves the flavor schema, so the
        // lowercased attribute names map back to their declared spelling.
        assert_eq!(node.attrs["itemId"], json!("9"));
        assert_eq!(node.attrs["maxItems"], json!(5));
        assert!(!node.attrs.contains_key("itemid"));
    }

    #[test]
    fn test_plain_div_is_transparent() {
        let doc = html_to_document("<div><p>inner</p></div>").expect("parse");
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].node_type, "paragraph");
    }

    #[test]
    fn test_code_block_language_from_class() {
        let node = parse_one(r#"<pre><code class="language-rust">fn f() {}</code></pre>"#);
        assert_eq!(node.node_type, "codeBlock");
        assert_eq!(node.attrs["language"], json!("rust"));
        assert_eq!(node.content[0].text.as_deref(), Some("fn f() {}"));
    }

    #[test]
    fn test_lists_and_implicit_paragraphs() {
        let node = parse_one("<ul><li>one</li><li><p>two</p></li></ul>");
        assert_eq!(node.node_type, "bulletList");
        assert_eq!(node.content.len(), 2);
        for item in &node.content {
            assert_eq!(item.node_type, "listItem");
            assert_eq!(item.content[0].node_type, "paragraph");
        }
    }

    #[test]
    fn test_ordered_list_start() {
        let node = parse_one(r#"<ol start="4"><li>x</li></ol>"#);
        assert_eq!(node.attrs["start"], json!(4));
    }

    #[test]
    fn test_iframe_defaults() {
        let node = parse_one(r#"<iframe src="https://v.example/e/1"></iframe>"#);
        assert_eq!(node.attrs["src"], json!("https://v.example/e/1"));
        assert_eq!(node.attrs["width"], json!("100%"));
        assert_eq!(node.attrs["height"], json!("400"));
    }

    #[test]
    fn test_table_structure() {
        let node = parse_one(
            "<table><thead><tr><th>H</th></tr></thead><tbody><tr><td>C</td></tr></tbody></table>",
        );
        assert_eq!(node.node_type, "table");
        assert_eq!(node.content.len(), 2);
        assert_eq!(node.content[0].content[0].node_type, "tableHeader");
        assert_eq!(node.content[1].content[0].node_type, "tableCell");
    }

    #[test]
    fn test_stray_text_becomes_paragraph() {
        let doc = html_to_document("just some text").expect("parse");
        assert_eq!(doc.blocks()[0].node_type, "paragraph");
        assert_eq!(doc.blocks()[0].text_content(), "just some text");
    }

    #[test]
    fn test_round_trip_standard_nodes() {
        let doc = Document::from_blocks(vec![
            DocNode::with_content("paragraph", vec![DocNode::text("hello")]),
            {
                let mut h = DocNode::new("heading", bag(json!({ "level": 2 })));
                h.content = vec![DocNode::text("Section")];
                h
            },
            DocNode::with_content(
                "blockquote",
                vec![DocNode::with_content(
                    "paragraph",
                    vec![DocNode::text("quoted")],
                )],
            ),
            DocNode::with_content("horizontalRule", vec![]),
        ]);
        let html = document_to_html(&doc);
        let parsed = html_to_document(&html).expect("parse");
        assert_eq!(document_to_html(&parsed), html);
    }

    #[test]
    fn test_round_trip_heading_levels() {
        for level in 1..=4 {
            let mut heading = DocNode::new("heading", bag(json!({ "level": level })));
            heading.content = vec![DocNode::text("Title")];
            let html = document_to_html(&Document::from_blocks(vec![heading]));
            let parsed = html_to_document(&html).expect("parse");
            assert_eq!(parsed.blocks()[0].attrs["level"], json!(level));
            assert_eq!(document_to_html(&parsed), html);
        }
    }

    #[test]
    fn test_round_trip_bare_image() {
        let doc = Document::from_blocks(vec![DocNode::new(
            "image",
            crate::schema::normalize("image", &bag(json!({ "src": "b.png", "alt": "B" }))),
        )]);
        let html = document_to_html(&doc);
        let parsed = html_to_document(&html).expect("parse");
        let img = &parsed.blocks()[0];
        assert_eq!(img.node_type, "image");
        assert_eq!(img.attrs["src"], json!("b.png"));
        assert_eq!(img.attrs["alt"], json!("B"));
        assert_eq!(img.attrs["caption"], Value::Null);
    }

    #[test]
    fn test_round_trip_captioned_image() {
        let doc = Document::from_blocks(vec![DocNode::new(
            "image",
            crate::schema::normalize(
                "image",
                &bag(json!({ "src": "a.jpg", "alt": "A", "caption": "Cap" })),
            ),
        )]);
        let html = document_to_html(&doc);
        let parsed = html_to_document(&html).expect("parse");
        let img = &parsed.blocks()[0];
        assert_eq!(img.attrs["src"], json!("a.jpg"));
        assert_eq!(img.attrs["alt"], json!("A"));
        assert_eq!(img.attrs["caption"], json!("Cap"));
        assert_eq!(document_to_html(&parsed), html);
    }

    #[test]
    fn test_round_trip_custom_components() {
        for attrs in [
            json!({ "type": "customButton", "align": "right", "fullWidth": true }),
            json!({ "type": "customRelatedItem", "itemId": "1,2", "layout": "list", "maxItems": 5 }),
            json!({ "type": "customBanner", "title": "Sale", "content": "Now on" }),
        ] {
            let normalized = crate::schema::normalize("customComponent", &bag(attrs));
            let doc =
                Document::from_blocks(vec![DocNode::new("customComponent", normalized.clone())]);
            let html = document_to_html(&doc);
            let parsed = html_to_document(&html).expect("parse");
            assert_eq!(
                parsed.blocks()[0].attrs, normalized,
                "component round trip drifted for {html}"
            );
        }
    }
}
