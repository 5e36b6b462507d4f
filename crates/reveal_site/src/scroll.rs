//! In-page anchor scrolling
//!
//! Clicking `<a href="#section">` brings `#section` to the top of the
//! viewport, gliding there when the animation engine is available.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reveal_animation::{Easing, Tween, TweenId};
use reveal_controller::Capabilities;
use reveal_core::{document, NodeId, SharedDocument, Viewport};

/// Viewport shared between the page and scroll animations
pub type SharedViewport = Arc<Mutex<Viewport>>;

pub fn lock_viewport(viewport: &SharedViewport) -> MutexGuard<'_, Viewport> {
    viewport.lock().unwrap_or_else(PoisonError::into_inner)
}

const SCROLL_MS: u32 = 500;
const SCROLL_Y: &str = "scrollY";

#[derive(Debug)]
pub struct SmoothScroll {
    document: SharedDocument,
    viewport: SharedViewport,
    running: Option<TweenId>,
}

impl SmoothScroll {
    pub fn new(document: SharedDocument, viewport: SharedViewport) -> Self {
        Self {
            document,
            viewport,
            running: None,
        }
    }

    /// Where clicking `node` would scroll to
    ///
    /// `node` must sit inside an `<a>` whose `href` is `#` followed by the id
    /// of an element in the document.
    pub fn anchor_target(&self, node: NodeId) -> Option<NodeId> {
        let doc = document::read(&self.document);
        let anchor = doc.closest_with_tag(node, "a")?;
        let id = doc.attribute(anchor, "href")?.strip_prefix('#')?;
        if id.is_empty() {
            return None;
        }
        doc.get_element_by_id(id)
    }

    /// Scroll so `target` sits at the top of the viewport
    ///
    /// Returns the destination scroll offset.
    pub fn scroll_to(&mut self, capabilities: &Capabilities, target: NodeId) -> Option<f32> {
        let top = document::read(&self.document).bounds(target)?.y().max(0.0);
        let from = lock_viewport(&self.viewport).scroll_y;

        self.cancel(capabilities);

        let viewport = Arc::clone(&self.viewport);
        let tween = Tween::new(SCROLL_MS)
            .property(SCROLL_Y, from, top)
            .easing(Easing::EaseInOutCubic)
            .on_update(move |frame| {
                if let Some(y) = frame.get(SCROLL_Y) {
                    lock_viewport(&viewport).scroll_y = y;
                }
            });
        self.running = capabilities.play(tween);

        tracing::debug!("SmoothScroll: {:?} from {} to {}", target, from, top);
        Some(top)
    }

    /// Stop gliding, leaving the viewport where it is
    pub fn cancel(&mut self, capabilities: &Capabilities) {
        if let Some(running) = self.running.take() {
            capabilities.cancel(running);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::AnimationScheduler;
    use reveal_core::{Document, Rect};

    fn page() -> (SharedDocument, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let link = doc.create_element(body, "a");
        doc.set_attribute(link, "href", "#contact");
        let label = doc.create_element(link, "span");
        let section = doc.create_element(body, "section");
        doc.set_attribute(section, "id", "contact");
        doc.set_bounds(section, Rect::new(0.0, 2400.0, 1280.0, 600.0));
        (doc.into_shared(), label, section)
    }

    #[test]
    fn test_anchor_target() {
        let (doc, label, section) = page();
        let scroll = SmoothScroll::new(doc.clone(), Arc::new(Mutex::new(Viewport::default())));
        assert_eq!(scroll.anchor_target(label), Some(section));

        let other = {
            let mut d = document::write(&doc);
            let body = d.body();
            let bare = d.create_element(body, "a");
            d.set_attribute(bare, "href", "#");
            let missing = d.create_element(body, "a");
            d.set_attribute(missing, "href", "#nowhere");
            let external = d.create_element(body, "a");
            d.set_attribute(external, "href", "https://example.com/#contact");
            [bare, missing, external]
        };
        for node in other {
            assert_eq!(scroll.anchor_target(node), None);
        }
    }

    #[test]
    fn test_scroll_glides() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let (doc, _, section) = page();
        let viewport = Arc::new(Mutex::new(Viewport::default()));
        let mut scroll = SmoothScroll::new(doc, Arc::clone(&viewport));

        assert_eq!(scroll.scroll_to(&caps, section), Some(2400.0));
        scheduler.advance(250.0);
        let mid = lock_viewport(&viewport).scroll_y;
        assert!(mid > 0.0 && mid < 2400.0);

        scheduler.advance(250.0);
        assert_eq!(lock_viewport(&viewport).scroll_y, 2400.0);
    }

    #[test]
    fn test_scroll_jumps_without_engine() {
        let (doc, _, section) = page();
        let viewport = Arc::new(Mutex::new(Viewport::default()));
        let mut scroll = SmoothScroll::new(doc, Arc::clone(&viewport));

        scroll.scroll_to(&Capabilities::without_animation(), section);
        assert_eq!(lock_viewport(&viewport).scroll_y, 2400.0);
    }
}
