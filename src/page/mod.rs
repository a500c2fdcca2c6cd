//! Deterministic headless page runtime.
//!
//! Hosts a [`Document`] together with the event sources a live page
//! provides: a millisecond clock with one-shot timers, subtree mutation
//! observers fed by the document's mutation journal, and a queue of
//! navigation lifecycle signals. Events are delivered single-threaded,
//! in a fixed order (lifecycle, then mutation notifications, then due
//! timers), to a consumer passed in as `&mut dyn PageHooks`, which keeps
//! the runtime and the engine borrows disjoint.
//!
//! Time only moves inside [`Page::advance`], so every run is
//! reproducible down to the event ordering.

use std::collections::VecDeque;
use std::time::Duration;

use log::trace;

use crate::dom::{self, Document, NodeId};

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Handle for a mutation observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// An event delivered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Full navigation completed; the whole document may have changed.
    Load,
    /// A frame element finished loading new content.
    FrameLoad(NodeId),
    /// Batched notification: something changed inside the observed subtree.
    Mutation(ObserverId),
    /// A scheduled timer came due.
    Timer(TimerId),
}

/// Consumer of page events.
///
/// The page is handed back on every call so the consumer can read and
/// mutate the document, schedule timers, and manage observers while the
/// runtime itself is not borrowed.
pub trait PageHooks {
    fn on_event(&mut self, page: &mut Page, event: PageEvent);
}

struct Timer {
    id: TimerId,
    deadline: u64,
}

struct Observer {
    id: ObserverId,
    node: NodeId,
    dirty: bool,
}

/// A document plus simulated clock, timers, observers, and lifecycle queue.
pub struct Page {
    doc: Document,
    clock_ms: u64,
    timers: Vec<Timer>,
    next_timer: u64,
    observers: Vec<Observer>,
    next_observer: u64,
    queue: VecDeque<PageEvent>,
}

impl Page {
    /// Create a page around an empty document.
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    /// Parse HTML into a fresh page.
    pub fn parse(html: &str) -> Self {
        Self::from_document(dom::parse_html(html))
    }

    fn from_document(mut doc: Document) -> Self {
        // Parse-time mutations predate every observer
        doc.take_mutations();
        Self {
            doc,
            clock_ms: 0,
            timers: Vec::new(),
            next_timer: 0,
            observers: Vec::new(),
            next_observer: 0,
            queue: VecDeque::new(),
        }
    }

    /// The hosted document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The hosted document, mutable. Structural edits made here are
    /// journaled and reach observers on the next pump.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Current simulated time.
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.clock_ms)
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Schedule a one-shot timer `delay` from now.
    pub fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        let deadline = self.clock_ms + delay.as_millis() as u64;
        self.timers.push(Timer { id, deadline });
        trace!("timer {:?} scheduled for t={}ms", id, deadline);
        id
    }

    /// Cancel a timer. Cancelling an already-fired timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    /// Number of timers currently scheduled.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    fn pop_due_timer(&mut self, until: u64) -> Option<Timer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.id.0))
            .map(|(i, _)| i)?;
        Some(self.timers.swap_remove(index))
    }

    // ------------------------------------------------------------------
    // Mutation observers
    // ------------------------------------------------------------------

    /// Watch a node's subtree for structural mutations. Changes from
    /// before the registration are never delivered.
    pub fn observe(&mut self, node: NodeId) -> ObserverId {
        // Settle older journal entries against older observers first
        self.sync_journal();
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Observer {
            id,
            node,
            dirty: false,
        });
        id
    }

    /// Stop a watch. Pending undelivered notifications are dropped.
    pub fn disconnect(&mut self, id: ObserverId) {
        self.observers.retain(|o| o.id != id);
    }

    /// Number of live observer registrations.
    pub fn active_observers(&self) -> usize {
        self.observers.len()
    }

    /// Distribute journaled mutations to the observers whose subtree
    /// they fall into.
    fn sync_journal(&mut self) {
        let entries = self.doc.take_mutations();
        if entries.is_empty() {
            return;
        }
        let doc = &self.doc;
        for observer in &mut self.observers {
            if observer.dirty {
                continue;
            }
            let node = observer.node;
            if entries
                .iter()
                .any(|&target| doc.subtree_contains(node, target))
            {
                observer.dirty = true;
            }
        }
    }

    fn take_notification(&mut self) -> Option<PageEvent> {
        self.sync_journal();
        let observer = self.observers.iter_mut().find(|o| o.dirty)?;
        observer.dirty = false;
        Some(PageEvent::Mutation(observer.id))
    }

    // ------------------------------------------------------------------
    // Lifecycle signals
    // ------------------------------------------------------------------

    /// Queue a full-page load signal.
    pub fn emit_load(&mut self) {
        self.queue.push_back(PageEvent::Load);
    }

    /// Queue a frame-load signal for the given element.
    pub fn emit_frame_load(&mut self, node: NodeId) {
        self.queue.push_back(PageEvent::FrameLoad(node));
    }

    // ------------------------------------------------------------------
    // Host simulation
    // ------------------------------------------------------------------

    /// Replace a node's children with parsed HTML, the way a rendering
    /// framework swaps a frame's content.
    pub fn set_inner_html(&mut self, parent: NodeId, html: &str) {
        let existing: Vec<_> = self.doc.children(parent).collect();
        for child in existing {
            self.doc.remove(child);
        }
        self.append_html(parent, html);
    }

    /// Parse HTML and append the resulting nodes under `parent`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) {
        let (fragment, body) = dom::parse_fragment(html);
        self.doc.import_children(&fragment, body, parent);
    }

    // ------------------------------------------------------------------
    // Event pump
    // ------------------------------------------------------------------

    /// Deliver queued lifecycle events and pending mutation
    /// notifications until none remain. Time does not advance.
    pub fn run_until_idle(&mut self, hooks: &mut dyn PageHooks) {
        loop {
            if let Some(event) = self.queue.pop_front() {
                trace!("deliver {:?}", event);
                hooks.on_event(self, event);
                continue;
            }
            if let Some(event) = self.take_notification() {
                trace!("deliver {:?}", event);
                hooks.on_event(self, event);
                continue;
            }
            break;
        }
    }

    /// Advance the clock by `delta`, firing due timers in deadline
    /// order and draining events between firings.
    pub fn advance(&mut self, delta: Duration, hooks: &mut dyn PageHooks) {
        self.run_until_idle(hooks);
        let target = self.clock_ms + delta.as_millis() as u64;
        while let Some(timer) = self.pop_due_timer(target) {
            self.clock_ms = timer.deadline;
            trace!("fire {:?} at t={}ms", timer.id, self.clock_ms);
            hooks.on_event(self, PageEvent::Timer(timer.id));
            self.run_until_idle(hooks);
        }
        self.clock_ms = target;
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
