//! Idempotent stylesheet injection.
//!
//! The disclosure widgets need a handful of presentation rules (summary
//! marker suppression, chevron rotation, separator decoration
//! overrides). They are injected once per document as a `<style>`
//! element keyed by a fixed id; whether a fresh injection happened is
//! decided by that id alone, never by document position.

use log::debug;

use crate::dom::{Document, NodeData, NodeId, qname};

/// Id carried by the injected style element.
pub const DISCLOSURE_STYLE_ID: &str = "collapsible-sections-style";

/// Rules backing the disclosure widgets.
pub const DISCLOSURE_CSS: &str = r#"
details.collapsible-section > summary {
  list-style: none;
  border-bottom: 1px solid #e5e7eb;
}
details.collapsible-section > summary::-webkit-details-marker {
  display: none;
}
.section-separator .section-separator-dashed-border {
  display: none;
}
.section-separator .section-separator-title {
  background: none;
  border: none;
  color: inherit;
  font-weight: bold;
  padding: 0;
  box-shadow: none;
  font-size: 1.1rem;
}
.collapsible-section-chevron {
  transition: transform 0.2s ease-in-out;
  flex-shrink: 0;
  margin-left: 8px;
}
details[open] > summary .collapsible-section-chevron {
  transform-origin: center;
  transform: rotate(-180deg);
}
[data-target^="product-view.galleryContainer"],
[data-target^="product-view.listContainer"] {
  gap: 1.25rem !important;
}
"#;

/// Inject a `<style>` element with the given id and rules into the
/// document head unless one with that id is already connected. Returns
/// whether an injection happened.
pub fn ensure_style_injected(dom: &mut Document, style_id: &str, css: &str) -> bool {
    if find_style(dom, style_id).is_some() {
        debug!("style #{style_id} already present, skipping injection");
        return false;
    }

    let style = dom.create_element(qname("style"), vec![]);
    dom.set_attr(style, "id", style_id);
    dom.append_text(style, css);

    // head is synthesized by the parser; fall back to the document root
    // for bare trees built by hand
    let parent = dom.find_by_tag("head").unwrap_or(dom.document());
    dom.append(parent, style);
    debug!("style #{style_id} injected");
    true
}

/// Inject the disclosure stylesheet with its fixed key.
pub fn ensure_disclosure_style(dom: &mut Document) -> bool {
    ensure_style_injected(dom, DISCLOSURE_STYLE_ID, DISCLOSURE_CSS)
}

fn find_style(dom: &Document, style_id: &str) -> Option<NodeId> {
    dom.find(|node| matches!(&node.data, NodeData::Element { name, id, .. }
        if name.local.as_ref() == "style" && id.as_deref() == Some(style_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_injects_once() {
        let mut dom = parse_html("<html><head></head><body></body></html>");

        assert!(ensure_disclosure_style(&mut dom));
        assert!(!ensure_disclosure_style(&mut dom));
        assert!(!ensure_disclosure_style(&mut dom));

        let styles: Vec<_> = {
            let head = dom.find_by_tag("head").unwrap();
            dom.children(head).collect()
        };
        assert_eq!(styles.len(), 1);
        assert_eq!(dom.element_id(styles[0]), Some(DISCLOSURE_STYLE_ID));
        assert!(dom.subtree_text(styles[0]).contains("collapsible-section-chevron"));
    }

    #[test]
    fn test_keyed_by_id_not_content() {
        let mut dom = parse_html("<html><head></head><body></body></html>");

        assert!(ensure_style_injected(&mut dom, "other-style", "p { color: red; }"));
        // Different key injects independently
        assert!(ensure_disclosure_style(&mut dom));
        // Same key, different rules: still considered present
        assert!(!ensure_style_injected(&mut dom, "other-style", "b { color: blue; }"));
    }

    #[test]
    fn test_existing_markup_style_respected() {
        let mut dom = parse_html(&format!(
            r#"<html><head><style id="{DISCLOSURE_STYLE_ID}">.x {{}}</style></head><body></body></html>"#
        ));

        assert!(!ensure_disclosure_style(&mut dom));
    }
}
