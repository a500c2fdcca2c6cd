//! Readiness detection for the section region.
//!
//! The region this crate rewrites is rendered asynchronously: at any
//! given moment it may not exist yet, exist but still be empty, or be
//! fully populated. The [`ReadinessDetector`] runs a small state
//! machine over those phases:
//!
//! - `Searching`: the region selector does not resolve. A 500 ms retry
//!   timer re-runs the lookup.
//! - `Observing`: the region exists but has no section content yet. A
//!   mutation watch on its subtree wakes the detector when children
//!   arrive.
//! - `Ready`: the region is populated. The watch and timers are torn
//!   down, the stylesheet is injected, and the blocks are folded.
//!
//! A fallback poll ticks every 1000 ms from `start` until Ready. It
//! covers changes the watch cannot see, like the region being swapped
//! out wholesale by a parent update.
//!
//! All three producers (retry, poll, watch) funnel into one idempotent
//! evaluation step, so duplicate wakeups are harmless.

use std::time::Duration;

use log::{debug, info};

use crate::dom::{Document, NodeId, Selector, query};
use crate::fold::style::ensure_disclosure_style;
use crate::fold::transform::{FoldOptions, find_separator, fold_region};
use crate::page::{ObserverId, Page, PageEvent, TimerId};

/// Where the detector currently is in the readiness lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// The region selector does not resolve yet.
    Searching,
    /// The region exists but holds no section content.
    Observing {
        /// The resolved region node the watch is armed on.
        region: NodeId,
    },
    /// The region was populated and has been folded.
    Ready {
        /// The region node that was folded.
        region: NodeId,
    },
}

/// Watches the document until the section region is populated, then
/// triggers the disclosure rewrite exactly once per arming.
#[derive(Debug)]
pub struct ReadinessDetector {
    region: Selector,
    opts: FoldOptions,
    retry_interval: Duration,
    poll_interval: Duration,
    state: DetectorState,
    watch: Option<ObserverId>,
    retry: Option<TimerId>,
    poll: Option<TimerId>,
    folded: usize,
    style_injected: bool,
}

impl ReadinessDetector {
    pub fn new(
        region: Selector,
        opts: FoldOptions,
        retry_interval: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            region,
            opts,
            retry_interval,
            poll_interval,
            state: DetectorState::Searching,
            watch: None,
            retry: None,
            poll: None,
            folded: 0,
            style_injected: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DetectorState {
        self.state
    }

    /// Running total of blocks converted across all armings.
    pub fn sections_folded(&self) -> usize {
        self.folded
    }

    /// Whether any arming injected the stylesheet into this document.
    pub fn style_injected(&self) -> bool {
        self.style_injected
    }

    /// (Re)arm the detector: tear down any live watch and timers, reset
    /// to Searching, arm the fallback poll, and evaluate once right
    /// away. Safe to call at any time, including after Ready.
    pub fn start(&mut self, page: &mut Page) {
        self.teardown(page);
        self.state = DetectorState::Searching;
        self.poll = Some(page.schedule(self.poll_interval));
        self.evaluate(page);
    }

    /// React to a page event. Only this detector's own retry timer,
    /// poll timer, and watch notifications trigger an evaluation;
    /// everything else is ignored.
    pub fn handle_event(&mut self, page: &mut Page, event: &PageEvent) {
        match *event {
            PageEvent::Timer(id) if self.retry == Some(id) => {
                self.retry = None;
                self.evaluate(page);
            }
            PageEvent::Timer(id) if self.poll == Some(id) => {
                // The poll re-arms every tick; entering Ready cancels it
                self.poll = Some(page.schedule(self.poll_interval));
                self.evaluate(page);
            }
            PageEvent::Mutation(id) if self.watch == Some(id) => {
                self.evaluate(page);
            }
            _ => {}
        }
    }

    /// Disconnect the watch and cancel both timers.
    fn teardown(&mut self, page: &mut Page) {
        if let Some(watch) = self.watch.take() {
            page.disconnect(watch);
        }
        if let Some(retry) = self.retry.take() {
            page.cancel(retry);
        }
        if let Some(poll) = self.poll.take() {
            page.cancel(poll);
        }
    }

    /// The single evaluation step every producer funnels into.
    fn evaluate(&mut self, page: &mut Page) {
        let doc = page.document();
        let region = query(doc, doc.document(), &self.region);
        match region {
            None => self.enter_searching(page),
            Some(region) => {
                if is_populated(page.document(), region, &self.opts.separator_class) {
                    self.enter_ready(page, region);
                } else {
                    self.enter_observing(page, region);
                }
            }
        }
    }

    fn enter_searching(&mut self, page: &mut Page) {
        // Any existing watch points at a disconnected node
        if let Some(watch) = self.watch.take() {
            page.disconnect(watch);
        }
        if self.state != DetectorState::Searching {
            debug!("section region no longer resolves, searching");
        }
        self.state = DetectorState::Searching;
        if self.retry.is_none() {
            self.retry = Some(page.schedule(self.retry_interval));
        }
    }

    fn enter_observing(&mut self, page: &mut Page, region: NodeId) {
        let unchanged = self.state == DetectorState::Observing { region };
        if self.watch.is_none() || !unchanged {
            if let Some(watch) = self.watch.take() {
                page.disconnect(watch);
            }
            self.watch = Some(page.observe(region));
        }
        if let Some(retry) = self.retry.take() {
            page.cancel(retry);
        }
        if self.poll.is_none() {
            self.poll = Some(page.schedule(self.poll_interval));
        }
        if !unchanged {
            debug!("section region found, watching for content");
        }
        self.state = DetectorState::Observing { region };
    }

    fn enter_ready(&mut self, page: &mut Page, region: NodeId) {
        // Teardown first: the rewrite below must not wake our own watch
        self.teardown(page);

        let doc = page.document_mut();
        if ensure_disclosure_style(doc) {
            self.style_injected = true;
        }
        match fold_region(doc, region, &self.opts) {
            Ok(count) => {
                self.folded += count;
                self.state = DetectorState::Ready { region };
                info!("section region ready, converted {count} block(s)");
            }
            Err(_) => {
                // Separator vanished between the check and the fold
                debug!("section structure not recognized, resuming watch");
                self.enter_observing(page, region);
            }
        }
    }
}

/// A region is ready once it has at least one element child and at
/// least one separator somewhere in its subtree.
fn is_populated(dom: &Document, region: NodeId, separator_class: &str) -> bool {
    dom.element_children(region).next().is_some()
        && find_separator(dom, region, separator_class).is_some()
}
