//! HTML serialization for the arena DOM.
//!
//! Walks the tree and emits HTML text. Output is parser-faithful rather
//! than pretty-printed: whitespace in the tree is whatever the source
//! document (and the retrofit) left there.

use super::arena::{Document, NodeData, NodeId};

/// Elements with no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is emitted raw (scripts, styles).
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize the whole document to HTML.
pub fn serialize(dom: &Document) -> String {
    let mut out = String::new();
    for child in dom.children(dom.document()) {
        serialize_into(dom, child, &mut out);
    }
    out
}

/// Serialize one node (and its subtree) to HTML.
pub fn serialize_node(dom: &Document, id: NodeId) -> String {
    let mut out = String::new();
    serialize_into(dom, id, &mut out);
    out
}

fn serialize_into(dom: &Document, id: NodeId, out: &mut String) {
    let Some(node) = dom.get(id) else { return };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                serialize_into(dom, child, out);
            }
        }
        NodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Text(text) => {
            let parent = node.parent;
            let raw = dom
                .element_name(parent)
                .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&n.as_ref()));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                out.push(' ');
                out.push_str(attr.name.local.as_ref());
                // Boolean attributes (open, disabled) serialize bare
                if !attr.value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&attr.value));
                    out.push('"');
                }
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            for child in dom.children(id) {
                serialize_into(dom, child, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
