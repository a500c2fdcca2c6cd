//! # pleat
//!
//! Retrofits collapsible `<details>`/`<summary>` disclosure widgets
//! onto dynamically loaded HTML section groups.
//!
//! ## Features
//!
//! - Idempotent structural rewrite: attributes, classes, and content
//!   order survive; already-converted blocks are never touched twice
//! - Readiness detection for asynchronously populated regions, with a
//!   mutation watch, retry backoff, and a fallback poll
//! - Lifecycle re-arming on page and frame loads, so framework-driven
//!   navigation cannot strand an unconverted region
//! - One-time stylesheet injection keyed by element id
//!
//! ## Quick Start
//!
//! ```
//! use pleat::{Config, fold_html};
//!
//! let html = r#"<div data-controller="product-view">
//!   <div id="product-section-view-frame">
//!     <div><div class="section-separator">Chapter 1</div><p>Text</p></div>
//!     <div><div class="section-separator">Chapter 2</div><p>More</p></div>
//!   </div>
//! </div>"#;
//!
//! let summary = fold_html(html, &Config::default()).unwrap();
//! assert_eq!(summary.sections_folded, 2);
//! ```
//!
//! ## Driving a live page
//!
//! For documents that fill in over time, install a [`Coordinator`] on a
//! [`page::Page`] and feed it events as the host produces them:
//!
//! ```
//! use std::time::Duration;
//! use pleat::{Config, Coordinator, page::Page};
//!
//! let mut page = Page::parse(r#"<div data-controller="product-view">
//!   <div id="product-section-view-frame"></div>
//! </div>"#);
//! let mut coordinator = Coordinator::new(&Config::default()).unwrap();
//! coordinator.install(&mut page);
//!
//! // Content arrives later; the mutation watch picks it up
//! let region = page.document().find_by_tag("div").unwrap();
//! let frame = page.document().element_children(region).next().unwrap();
//! page.append_html(
//!     frame,
//!     r#"<div><div class="section-separator">Late</div><p>Body</p></div>"#,
//! );
//! page.run_until_idle(&mut coordinator);
//! page.advance(Duration::from_secs(2), &mut coordinator);
//!
//! assert_eq!(coordinator.sections_folded(), 1);
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod fold;
pub mod page;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::Config;
pub use error::{Error, Result};
pub use fold::{
    Coordinator, DetectorState, FoldOptions, FoldSummary, ReadinessDetector, fold_bytes,
    fold_file, fold_html, fold_region,
};
