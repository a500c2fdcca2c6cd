//! Collapsible-section retrofit pipeline.
//!
//! This module turns the sibling blocks inside a lazily rendered
//! section region into native `<details>`/`<summary>` disclosure
//! widgets. It has four parts:
//!
//! - [`style`]: one-time stylesheet injection, keyed by element id.
//! - [`transform`]: the structural rewrite of each section block.
//! - [`detector`]: readiness detection for the asynchronously
//!   populated region.
//! - [`coordinator`]: re-arms detection on page and frame loads.
//!
//! For static markup the whole pipeline runs in one call:
//!
//! ```
//! use pleat::{Config, fold_html};
//!
//! let html = r#"<div data-controller="product-view">
//!   <div id="product-section-view-frame">
//!     <div><div class="section-separator">Chapter 1</div><p>Text</p></div>
//!   </div>
//! </div>"#;
//!
//! let summary = fold_html(html, &Config::default()).unwrap();
//! assert_eq!(summary.sections_folded, 1);
//! assert!(summary.html.contains("<details"));
//! ```

mod coordinator;
mod detector;
mod style;
mod transform;

pub use coordinator::Coordinator;
pub use detector::{DetectorState, ReadinessDetector};
pub use style::{DISCLOSURE_STYLE_ID, ensure_disclosure_style, ensure_style_injected};
pub use transform::{FoldOptions, TRANSFORM_MARKER, fold_region};

use std::path::Path;

use crate::config::Config;
use crate::dom;
use crate::error::Result;
use crate::page::Page;
use crate::util::decode_html;

/// What a [`fold_html`] run did.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct FoldSummary {
    /// The serialized document after the rewrite.
    pub html: String,
    /// Blocks converted into disclosure widgets.
    pub sections_folded: usize,
    /// Whether the stylesheet was injected by this run.
    pub style_injected: bool,
    /// Whether the region selector resolved at all.
    pub region_found: bool,
}

/// Run the whole retrofit over a static document: parse, install a
/// coordinator, deliver the load signal, drain events, serialize.
///
/// A document without the region comes back untouched with
/// `region_found = false`; the detector simply parks in its searching
/// state. The only error a static run can produce is a malformed
/// selector in `config`.
pub fn fold_html(html: &str, config: &Config) -> Result<FoldSummary> {
    let mut page = Page::parse(html);
    let mut coordinator = Coordinator::new(config)?;
    coordinator.install(&mut page);
    page.emit_load();
    page.run_until_idle(&mut coordinator);

    let region_found = !matches!(coordinator.state(), DetectorState::Searching);
    Ok(FoldSummary {
        html: dom::serialize(page.document()),
        sections_folded: coordinator.sections_folded(),
        style_injected: coordinator.style_injected(),
        region_found,
    })
}

/// [`fold_html`] over raw bytes. Decodes UTF-8, a `<meta charset>`
/// declaration, or Windows-1252, in that order.
pub fn fold_bytes(bytes: &[u8], config: &Config) -> Result<FoldSummary> {
    fold_html(&decode_html(bytes), config)
}

/// [`fold_html`] over a file on disk.
pub fn fold_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<FoldSummary> {
    let bytes = std::fs::read(path)?;
    fold_bytes(&bytes, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_html_reports_absent_region() {
        let summary = fold_html("<p>plain page</p>", &Config::default()).unwrap();
        assert_eq!(summary.sections_folded, 0);
        assert!(!summary.style_injected);
        assert!(!summary.region_found);
        assert!(!summary.html.contains("<details"));
    }

    #[test]
    fn test_fold_html_converts_and_reports() {
        let html = concat!(
            r#"<div data-controller="product-view"><div id="product-section-view-frame">"#,
            r#"<div><div class="section-separator">One</div><p>a</p></div>"#,
            r#"<div><div class="section-separator">Two</div><p>b</p></div>"#,
            "</div></div>",
        );
        let summary = fold_html(html, &Config::default()).unwrap();

        assert_eq!(summary.sections_folded, 2);
        assert!(summary.style_injected);
        assert!(summary.region_found);
        assert!(summary.html.contains(r#"<style id="collapsible-sections-style">"#));
        assert!(summary.html.contains("<summary"));
    }

    #[test]
    fn test_fold_html_is_idempotent_over_its_own_output() {
        let html = concat!(
            r#"<div data-controller="product-view"><div id="product-section-view-frame">"#,
            r#"<div><div class="section-separator">One</div><p>a</p></div>"#,
            "</div></div>",
        );
        let first = fold_html(html, &Config::default()).unwrap();
        let second = fold_html(&first.html, &Config::default()).unwrap();

        assert_eq!(second.sections_folded, 0);
        assert!(!second.style_injected);
        assert_eq!(first.html, second.html);
    }
}
