//! Lifecycle tests for detection over a live page.
//!
//! These drive a `Coordinator` against the deterministic page runtime:
//! content arriving late, regions being swapped wholesale, frame and
//! page load signals, and documents that never become ready. Time only
//! moves when `advance` is called, so every timing here is exact.

use std::time::Duration;

use pleat::dom::{self, NodeId, Selector, query};
use pleat::page::Page;
use pleat::{Config, Coordinator, DetectorState};

const BARE_PAGE: &str = "<html><head></head><body><main></main></body></html>";

const PAGE_WITH_EMPTY_REGION: &str = concat!(
    "<html><head></head><body>",
    r#"<div data-controller="product-view">"#,
    r#"<div id="product-section-view-frame"></div>"#,
    "</div></body></html>",
);

const SECTIONS: &str = concat!(
    r#"<div><div class="section-separator">One</div><p>alpha</p></div>"#,
    r#"<div><div class="section-separator">Two</div><p>beta</p></div>"#,
);

const REGION_MARKUP: &str = concat!(
    r#"<div data-controller="product-view">"#,
    r#"<div id="product-section-view-frame">"#,
    r#"<div><div class="section-separator">One</div><p>alpha</p></div>"#,
    r#"<div><div class="section-separator">Two</div><p>beta</p></div>"#,
    "</div></div>",
);

const EMPTY_REGION_MARKUP: &str = concat!(
    r#"<div data-controller="product-view">"#,
    r#"<div id="product-section-view-frame"></div>"#,
    "</div>",
);

fn coordinator() -> Coordinator {
    Coordinator::new(&Config::default()).expect("default config compiles")
}

fn region_node(page: &Page) -> NodeId {
    let selector =
        Selector::compile(&Config::default().region_selector).expect("region selector");
    let doc = page.document();
    query(doc, doc.document(), &selector).expect("region present")
}

// ============================================================================
// Late arrival
// ============================================================================

#[test]
fn test_install_before_region_exists() {
    let mut page = Page::parse(BARE_PAGE);
    let mut coordinator = coordinator();
    coordinator.install(&mut page);

    assert_eq!(coordinator.state(), DetectorState::Searching);
    // Retry backoff plus the fallback poll
    assert_eq!(page.active_timers(), 2);

    // One retry passes with nothing to find
    page.advance(Duration::from_millis(600), &mut coordinator);
    assert_eq!(coordinator.state(), DetectorState::Searching);
    assert_eq!(page.active_timers(), 2);

    // The whole region renders in one go
    let main = page.document().find_by_tag("main").expect("main");
    page.append_html(main, REGION_MARKUP);
    page.advance(Duration::from_millis(500), &mut coordinator);

    assert!(matches!(coordinator.state(), DetectorState::Ready { .. }));
    assert_eq!(coordinator.sections_folded(), 2);
    assert_eq!(page.active_timers(), 0, "all timers torn down on Ready");
    assert_eq!(page.active_observers(), 0, "watch torn down on Ready");
}

#[test]
fn test_sections_arriving_at_600ms_with_premarked_block() {
    let mut page = Page::parse(BARE_PAGE);
    let mut coordinator = coordinator();
    coordinator.install(&mut page);
    assert_eq!(coordinator.state(), DetectorState::Searching);

    // The empty region frame renders shortly after install. Nothing
    // watches the body, so only the 500 ms retry can discover it.
    let main = page.document().find_by_tag("main").expect("main");
    page.append_html(main, EMPTY_REGION_MARKUP);
    page.advance(Duration::from_millis(500), &mut coordinator);

    assert!(matches!(coordinator.state(), DetectorState::Observing { .. }));
    assert_eq!(page.active_observers(), 1);
    assert_eq!(page.active_timers(), 1);

    // t=600: the host renders three blocks, one already converted
    page.advance(Duration::from_millis(100), &mut coordinator);
    let region = region_node(&page);
    page.append_html(
        region,
        concat!(
            r#"<div data-transformed="true"><div class="section-separator">Done</div></div>"#,
            r#"<div><div class="section-separator">New 1</div><p>a</p></div>"#,
            r#"<div><div class="section-separator">New 2</div><p>b</p></div>"#,
        ),
    );
    page.run_until_idle(&mut coordinator);

    assert!(matches!(coordinator.state(), DetectorState::Ready { .. }));
    assert_eq!(coordinator.sections_folded(), 2, "marked block skipped");
    assert_eq!(page.active_observers(), 0);
    assert_eq!(page.active_timers(), 0);

    let html = dom::serialize(page.document());
    assert_eq!(html.matches("<details").count(), 2);
    assert!(html.contains(r#"data-transformed="true""#));
}

// ============================================================================
// Recovery paths
// ============================================================================

#[test]
fn test_poll_recovers_from_wholesale_replacement() {
    let mut page = Page::parse(PAGE_WITH_EMPTY_REGION);
    let mut coordinator = coordinator();
    coordinator.install(&mut page);
    assert!(matches!(coordinator.state(), DetectorState::Observing { .. }));

    // The framework replaces the region's whole parent. The subtree
    // watch on the old region never fires for this.
    let body = page.document().find_by_tag("body").expect("body");
    page.set_inner_html(body, REGION_MARKUP);
    page.run_until_idle(&mut coordinator);
    assert!(
        matches!(coordinator.state(), DetectorState::Observing { .. }),
        "no mutation reaches the stale watch"
    );

    // The next poll tick re-resolves and converts
    page.advance(Duration::from_millis(1000), &mut coordinator);

    assert!(matches!(coordinator.state(), DetectorState::Ready { .. }));
    assert_eq!(coordinator.sections_folded(), 2);
    assert_eq!(page.active_observers(), 0);
    assert_eq!(page.active_timers(), 0);
}

#[test]
fn test_unready_region_parks_with_bounded_resources() {
    let mut page = Page::parse(PAGE_WITH_EMPTY_REGION);
    let mut coordinator = coordinator();
    coordinator.install(&mut page);

    let region = region_node(&page);
    page.append_html(region, "<div><p>spinner, never a separator</p></div>");
    page.run_until_idle(&mut coordinator);

    // Five seconds of polling changes nothing
    page.advance(Duration::from_secs(5), &mut coordinator);

    assert!(matches!(coordinator.state(), DetectorState::Observing { .. }));
    assert_eq!(coordinator.sections_folded(), 0);
    assert_eq!(page.active_observers(), 1, "exactly one watch");
    assert_eq!(page.active_timers(), 1, "exactly one poll");
    assert!(!dom::serialize(page.document()).contains("<details"));
}

// ============================================================================
// Lifecycle signals
// ============================================================================

#[test]
fn test_frame_load_converts_each_new_generation() {
    let mut page = Page::parse(PAGE_WITH_EMPTY_REGION);
    let mut coordinator = coordinator();
    coordinator.install(&mut page);

    // Three navigation cycles, each swapping in fresh unconverted blocks
    for cycle in 1..=3 {
        let region = region_node(&page);
        page.set_inner_html(region, SECTIONS);
        page.emit_frame_load(region);
        page.run_until_idle(&mut coordinator);

        assert!(matches!(coordinator.state(), DetectorState::Ready { .. }));
        assert_eq!(coordinator.sections_folded(), cycle * 2);
    }

    // The stylesheet went in once, not once per cycle
    let html = dom::serialize(page.document());
    assert_eq!(html.matches(r#"id="collapsible-sections-style""#).count(), 1);
    assert_eq!(html.matches("<style").count(), 1);
}

#[test]
fn test_frame_load_on_converted_content_is_a_no_op() {
    let mut page = Page::parse(PAGE_WITH_EMPTY_REGION);
    let region = region_node(&page);
    page.append_html(region, SECTIONS);

    let mut coordinator = coordinator();
    coordinator.install(&mut page);
    assert_eq!(coordinator.sections_folded(), 2);
    let before = dom::serialize(page.document());

    // Re-delivering the frame load must not double-convert
    page.emit_frame_load(region);
    page.run_until_idle(&mut coordinator);

    assert_eq!(coordinator.sections_folded(), 2);
    assert_eq!(dom::serialize(page.document()), before);
    assert_eq!(page.active_timers(), 0);
    assert_eq!(page.active_observers(), 0);
}

#[test]
fn test_page_load_restarts_detection() {
    let mut page = Page::parse(PAGE_WITH_EMPTY_REGION);
    let region = region_node(&page);
    page.append_html(region, SECTIONS);

    let mut coordinator = coordinator();
    coordinator.install(&mut page);
    assert_eq!(coordinator.sections_folded(), 2);

    // A soft navigation appends one more block and replays the load
    page.append_html(
        region,
        r#"<div><div class="section-separator">Three</div><p>gamma</p></div>"#,
    );
    page.emit_load();
    page.run_until_idle(&mut coordinator);

    assert_eq!(coordinator.sections_folded(), 3);
    assert!(matches!(coordinator.state(), DetectorState::Ready { .. }));
}

#[test]
fn test_frame_load_for_unrelated_frame_is_ignored() {
    let mut page = Page::parse(PAGE_WITH_EMPTY_REGION);
    let region = region_node(&page);
    page.append_html(region, SECTIONS);

    let mut coordinator = coordinator();
    coordinator.install(&mut page);
    assert_eq!(page.active_timers(), 0);

    let body = page.document().find_by_tag("body").expect("body");
    page.emit_frame_load(body);
    page.run_until_idle(&mut coordinator);

    // No re-arm happened
    assert_eq!(page.active_timers(), 0);
    assert_eq!(page.active_observers(), 0);
}
