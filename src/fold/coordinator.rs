//! Wires the readiness detector into the page event stream.
//!
//! Host frameworks tear regions down and rebuild them on navigation,
//! so detection cannot be armed just once. The [`Coordinator`] listens
//! for page lifecycle signals and re-arms the detector whenever the
//! region may have been rebuilt:
//!
//! - a full page load,
//! - a frame load whose target is the section region itself.
//!
//! Each re-arm is a complete teardown of the previous watch and timers
//! followed by a fresh start, so there is never more than one live
//! watch/poll pair no matter how often navigation fires.

use log::debug;

use crate::config::Config;
use crate::dom::{Selector, matches};
use crate::error::Result;
use crate::fold::detector::{DetectorState, ReadinessDetector};
use crate::fold::transform::FoldOptions;
use crate::page::{Page, PageEvent, PageHooks};

/// Owns the detector and re-arms it on lifecycle signals.
#[derive(Debug)]
pub struct Coordinator {
    region: Selector,
    detector: ReadinessDetector,
}

impl Coordinator {
    /// Compile the configured region selector and build the detector.
    /// Fails with [`crate::Error::Selector`] on malformed input.
    pub fn new(config: &Config) -> Result<Self> {
        let region = Selector::compile(&config.region_selector)?;
        let detector = ReadinessDetector::new(
            region.clone(),
            FoldOptions::from(config),
            config.retry_interval,
            config.poll_interval,
        );
        Ok(Self { region, detector })
    }

    /// Arm the detector for the first time. Works whether the region
    /// does not exist yet, exists empty, or is already populated.
    pub fn install(&mut self, page: &mut Page) {
        self.detector.start(page);
    }

    /// Current detector state.
    pub fn state(&self) -> DetectorState {
        self.detector.state()
    }

    /// Running total of blocks converted across all armings.
    pub fn sections_folded(&self) -> usize {
        self.detector.sections_folded()
    }

    /// Whether the stylesheet was injected by any arming.
    pub fn style_injected(&self) -> bool {
        self.detector.style_injected()
    }
}

impl PageHooks for Coordinator {
    fn on_event(&mut self, page: &mut Page, event: PageEvent) {
        match event {
            PageEvent::Load => {
                debug!("page load, arming section detection");
                self.detector.start(page);
            }
            PageEvent::FrameLoad(node) => {
                if matches(page.document(), node, &self.region) {
                    debug!("section frame reloaded, re-arming detection");
                    self.detector.start(page);
                }
            }
            PageEvent::Mutation(_) | PageEvent::Timer(_) => {
                self.detector.handle_event(page, &event);
            }
        }
    }
}
