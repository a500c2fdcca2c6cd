//! Compiled CSS selectors and document queries.
//!
//! The engine's structural contracts (the region path, test fixtures)
//! arrive as selector strings; they are compiled once and matched many
//! times against the live document.

use selectors::context::{MatchingContext, SelectorCaches};

use super::arena::{Document, NodeId};
use super::element_ref::{ElementRef, PleatSelectors};
use crate::error::{Error, Result};

/// A compiled CSS selector.
#[derive(Clone)]
pub struct Selector {
    inner: selectors::parser::Selector<PleatSelectors>,
    source: String,
}

impl Selector {
    /// Compile a single selector. Selector lists (`a, b`) are not
    /// accepted; the engine always targets one structural path.
    pub fn compile(text: &str) -> Result<Self> {
        let mut parser_input = cssparser::ParserInput::new(text);
        let mut parser = cssparser::Parser::new(&mut parser_input);
        let inner = selectors::parser::Selector::parse(&PleatSelectors, &mut parser)
            .map_err(|_| Error::Selector(text.to_string()))?;
        Ok(Self {
            inner,
            source: text.to_string(),
        })
    }

    /// The selector text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the selector matches the given element.
    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );
        selectors::matching::matches_selector(&self.inner, 0, None, element, &mut context)
    }
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Selector({})", self.source)
    }
}

/// Whether the node is an element matching the selector.
pub fn matches(dom: &Document, id: NodeId, selector: &Selector) -> bool {
    dom.is_element(id) && selector.matches(&ElementRef::new(dom, id))
}

/// First element below `root` (exclusive) matching the selector, in
/// document order.
pub fn query(dom: &Document, root: NodeId, selector: &Selector) -> Option<NodeId> {
    dom.descendants(root)
        .find(|&id| matches(dom, id, selector))
}

/// All elements below `root` (exclusive) matching the selector, in
/// document order.
pub fn query_all(dom: &Document, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    dom.descendants(root)
        .filter(|&id| matches(dom, id, selector))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::tree_sink::parse_html;

    #[test]
    fn test_compile_rejects_garbage() {
        assert!(matches!(
            Selector::compile("div[unclosed"),
            Err(Error::Selector(_))
        ));
        assert!(Selector::compile("div > .group").is_ok());
    }

    #[test]
    fn test_query_finds_first_in_document_order() {
        let dom = parse_html(
            r#"<div><p class="x">one</p></div><section><p class="x">two</p></section>"#,
        );
        let selector = Selector::compile("p.x").unwrap();

        let first = query(&dom, dom.document(), &selector).expect("match");
        let text = dom.subtree_text(first);
        assert_eq!(text, "one");

        let all = query_all(&dom, dom.document(), &selector);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_query_excludes_root() {
        let dom = parse_html(r#"<div class="outer"><div class="outer inner"></div></div>"#);
        let selector = Selector::compile(".outer").unwrap();

        let outer = dom.find_by_tag("div").unwrap();
        let hit = query(&dom, outer, &selector).expect("inner match");
        assert!(dom.has_class(hit, "inner"));
    }

    #[test]
    fn test_query_resolves_region_path() {
        let dom = parse_html(
            r#"
            <main>
              <div data-controller="product-view">
                <div id="product-section-view-frame"></div>
              </div>
            </main>
        "#,
        );
        let selector = Selector::compile(crate::config::REGION_SELECTOR).unwrap();

        let region = query(&dom, dom.document(), &selector).expect("region resolves");
        assert_eq!(dom.element_id(region), Some("product-section-view-frame"));
    }
}
