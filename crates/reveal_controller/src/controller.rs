//! Reveal controller
//!
//! Watches marker-classed elements and plays their entrance exactly once,
//! the first time enough of them scrolls into view:
//!
//! - `fade-in-up`: opacity 0 to 1 while rising from 30px below
//! - `fade-in-left`: opacity 0 to 1 while sliding in from 50px to the left
//! - `counter`: text counts from 0 up to `data-target`
//!
//! An element may carry several markers; each applies independently. Once
//! triggered, an element is no longer watched and is tagged
//! `data-revealed="true"` so a later [`RevealController::start`] leaves it
//! alone.

use std::sync::Arc;

use indexmap::IndexMap;
use reveal_animation::Tween;
use reveal_core::{
    document, Document, IntersectionEntry, IntersectionObserver, NodeId, SharedDocument, Viewport,
};
use smallvec::SmallVec;

use crate::capability::Capabilities;
use crate::config::{MarkerClasses, RevealConfig};
use crate::counter::{counter_text, CounterSpec};
use crate::transition::{style_tween, OPACITY, TRANSLATE_X, TRANSLATE_Y};

/// Attribute set on an element once its reveal has fired
pub const REVEALED_ATTRIBUTE: &str = "data-revealed";

const COUNT: &str = "count";

/// Reveal behaviour selected by a marker class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealKind {
    FadeUp,
    FadeLeft,
    Counter,
}

impl RevealKind {
    /// Kinds selected by the marker classes `node` carries, in a fixed order
    pub fn of(doc: &Document, node: NodeId, classes: &MarkerClasses) -> SmallVec<[Self; 3]> {
        let mut kinds = SmallVec::new();
        if doc.has_class(node, &classes.fade_up) {
            kinds.push(Self::FadeUp);
        }
        if doc.has_class(node, &classes.fade_left) {
            kinds.push(Self::FadeLeft);
        }
        if doc.has_class(node, &classes.counter) {
            kinds.push(Self::Counter);
        }
        kinds
    }
}

/// Where an element stands with respect to this controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchState {
    /// Registered and waiting to become visible
    Watching,
    /// Already revealed; never fires again
    Triggered,
}

pub struct RevealController {
    config: RevealConfig,
    capabilities: Capabilities,
    document: SharedDocument,
    /// `None` when the host has no visibility watcher
    observer: Option<IntersectionObserver>,
    watched: IndexMap<NodeId, SmallVec<[RevealKind; 3]>>,
    triggered: usize,
}

impl std::fmt::Debug for RevealController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealController")
            .field("watching", &self.watched.len())
            .field("triggered", &self.triggered)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl RevealController {
    pub fn new(document: SharedDocument, config: RevealConfig, capabilities: Capabilities) -> Self {
        let observer = capabilities
            .has_watch()
            .then(|| IntersectionObserver::new(config.observer_options()));
        Self {
            config,
            capabilities,
            document,
            observer,
            watched: IndexMap::new(),
            triggered: 0,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Register every marker-classed element under `root`
    ///
    /// Elements already watched or already revealed are skipped, so calling
    /// this twice never doubles a registration. Without a visibility watcher
    /// every new element is revealed on the spot with no animation.
    ///
    /// Returns the number of newly registered elements.
    pub fn start(&mut self, root: NodeId) -> usize {
        let candidates: Vec<(NodeId, SmallVec<[RevealKind; 3]>)> = {
            let doc = document::read(&self.document);
            let markers = self.config.classes.all();
            doc.query_class_any(root, &markers)
                .into_iter()
                .filter(|node| !self.watched.contains_key(node))
                .filter(|&node| !doc.has_attribute(node, REVEALED_ATTRIBUTE))
                .map(|node| (node, RevealKind::of(&doc, node, &self.config.classes)))
                .collect()
        };

        let count = candidates.len();
        match self.observer.as_mut() {
            Some(observer) => {
                for (node, kinds) in candidates {
                    observer.observe(node);
                    self.watched.insert(node, kinds);
                }
                tracing::debug!("RevealController: watching {} new element(s)", count);
            }
            None => {
                for (node, kinds) in candidates {
                    self.trigger(node, &kinds, true);
                }
                tracing::debug!(
                    "RevealController: no visibility watcher, revealed {} element(s) immediately",
                    count
                );
            }
        }
        count
    }

    /// Check visibility against `viewport` and reveal what crossed the threshold
    ///
    /// Returns the revealed elements in the order they were reported.
    pub fn poll(&mut self, viewport: &Viewport) -> Vec<NodeId> {
        let entries = {
            let Some(observer) = self.observer.as_mut() else {
                return Vec::new();
            };
            let doc = document::read(&self.document);
            observer.take_records(&doc, viewport)
        };
        self.process_batch(&entries)
    }

    /// Handle a batch of visibility changes, in delivery order
    ///
    /// Entries for elements no longer watched are ignored, so a stale or
    /// duplicated entry can never fire a reveal twice.
    pub fn process_batch(&mut self, entries: &[IntersectionEntry]) -> Vec<NodeId> {
        let mut revealed = Vec::new();
        for entry in entries {
            if !entry.is_intersecting || entry.intersection_ratio < self.config.threshold {
                continue;
            }
            let Some(kinds) = self.watched.shift_remove(&entry.target) else {
                tracing::trace!("RevealController: ignoring entry for {:?}", entry.target);
                continue;
            };
            self.trigger(entry.target, &kinds, false);
            revealed.push(entry.target);
        }
        revealed
    }

    pub fn state(&self, node: NodeId) -> Option<WatchState> {
        if self.watched.contains_key(&node) {
            return Some(WatchState::Watching);
        }
        document::read(&self.document)
            .has_attribute(node, REVEALED_ATTRIBUTE)
            .then_some(WatchState::Triggered)
    }

    pub fn is_watching(&self, node: NodeId) -> bool {
        self.watched.contains_key(&node)
    }

    /// Elements still waiting to be revealed
    pub fn pending_count(&self) -> usize {
        self.watched.len()
    }

    /// Elements this controller has revealed
    pub fn triggered_count(&self) -> usize {
        self.triggered
    }

    /// Stop watching everything without revealing it
    pub fn stop(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.disconnect();
        }
        let dropped = self.watched.len();
        self.watched.clear();
        tracing::debug!("RevealController: stopped, {} element(s) left unrevealed", dropped);
    }

    fn trigger(&mut self, node: NodeId, kinds: &[RevealKind], snap: bool) {
        for kind in kinds {
            match kind {
                RevealKind::FadeUp => self.fade(node, TRANSLATE_Y, self.config.fade_up_offset, snap),
                RevealKind::FadeLeft => {
                    self.fade(node, TRANSLATE_X, self.config.fade_left_offset, snap)
                }
                RevealKind::Counter => self.count(node, snap),
            }
        }

        if let Some(observer) = self.observer.as_mut() {
            observer.unobserve(node);
        }
        document::write(&self.document).set_attribute(node, REVEALED_ATTRIBUTE, "true");
        self.triggered += 1;
        tracing::debug!("RevealController: revealed {:?} ({:?})", node, kinds);
    }

    fn fade(&self, node: NodeId, axis: &'static str, offset: f32, snap: bool) {
        let tween = Tween::new(self.config.fade_duration_ms)
            .property(OPACITY, 0.0, 1.0)
            .property(axis, offset, 0.0)
            .easing(self.config.easing);
        self.run(style_tween(&self.document, node, tween), snap);
    }

    fn count(&self, node: NodeId, snap: bool) {
        let counter = CounterSpec::read(
            &document::read(&self.document),
            node,
            self.config.counter_duration_ms,
        );
        let counter = match counter {
            Ok(counter) => counter,
            Err(err) => {
                tracing::warn!("RevealController: counter {:?} shows 0: {}", node, err);
                document::write(&self.document).set_text(node, "0");
                return;
            }
        };

        let target = counter.target;
        let frames = Arc::clone(&self.document);
        let done = Arc::clone(&self.document);
        let tween = Tween::new(counter.duration_ms)
            .property(COUNT, 0.0, target as f32)
            .easing(self.config.easing)
            .on_update(move |frame| {
                if let Some(value) = frame.get(COUNT) {
                    document::write(&frames).set_text(node, counter_text(value));
                }
            })
            .on_complete(move || {
                // The float track can miss large targets; land on the exact integer
                document::write(&done).set_text(node, target.to_string());
            });
        self.run(tween, snap);
    }

    fn run(&self, mut tween: Tween, snap: bool) {
        if snap {
            tween.finish();
        } else {
            self.capabilities.play(tween);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::AnimationScheduler;
    use reveal_core::Rect;

    const VIEWPORT: Viewport = Viewport {
        scroll_x: 0.0,
        scroll_y: 0.0,
        width: 1280.0,
        height: 800.0,
    };

    struct Fixture {
        scheduler: AnimationScheduler,
        doc: SharedDocument,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scheduler: AnimationScheduler::new(),
                doc: Document::new().into_shared(),
            }
        }

        /// Element 200px tall whose top sits at `top` in document coordinates
        fn element(&self, classes: &[&str], top: f32) -> NodeId {
            let mut doc = document::write(&self.doc);
            let body = doc.body();
            let el = doc.create_element(body, "div");
            for class in classes {
                doc.add_class(el, class);
            }
            doc.set_bounds(el, Rect::new(0.0, top, 400.0, 200.0));
            el
        }

        fn counter(&self, target: Option<&str>, top: f32) -> NodeId {
            let el = self.element(&["counter"], top);
            if let Some(target) = target {
                document::write(&self.doc).set_data(el, "target", target);
            }
            el
        }

        fn body(&self) -> NodeId {
            document::read(&self.doc).body()
        }

        fn controller(&self) -> RevealController {
            RevealController::new(
                Arc::clone(&self.doc),
                RevealConfig::default(),
                Capabilities::full(self.scheduler.handle()),
            )
        }

        fn style(&self, node: NodeId) -> reveal_core::ElementStyle {
            document::read(&self.doc).style(node).unwrap()
        }

        fn text(&self, node: NodeId) -> String {
            document::read(&self.doc).text(node).unwrap().to_string()
        }
    }

    #[test]
    fn test_fade_up_reveals_once() {
        let fx = Fixture::new();
        // 30px of 200px above the 750px trigger line: 15% visible
        let card = fx.element(&["fade-in-up"], 720.0);
        let mut controller = fx.controller();

        assert_eq!(controller.start(fx.body()), 1);
        assert_eq!(controller.poll(&VIEWPORT), vec![card]);

        let style = fx.style(card);
        assert_eq!(style.opacity, 0.0);
        assert_eq!(style.translate_y, 30.0);

        fx.scheduler.advance(300.0);
        let mid = fx.style(card);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.translate_y > 0.0 && mid.translate_y < 30.0);

        fx.scheduler.advance(300.0);
        assert!(fx.style(card).is_at_rest());
        assert_eq!(controller.state(card), Some(WatchState::Triggered));

        // Scroll away and back: nothing fires again
        assert!(controller.poll(&VIEWPORT.scrolled_to(2000.0)).is_empty());
        assert!(controller.poll(&VIEWPORT).is_empty());
        assert_eq!(fx.scheduler.tween_count(), 0);
        assert_eq!(controller.triggered_count(), 1);
    }

    #[test]
    fn test_fade_left_starts_offset_left() {
        let fx = Fixture::new();
        let el = fx.element(&["fade-in-left"], 100.0);
        let mut controller = fx.controller();
        controller.start(fx.body());
        controller.poll(&VIEWPORT);

        assert_eq!(fx.style(el).translate_x, -50.0);
        fx.scheduler.advance(600.0);
        assert!(fx.style(el).is_at_rest());
    }

    #[test]
    fn test_below_threshold_does_not_trigger() {
        let fx = Fixture::new();
        // 10px of 200px (5%) above the trigger line
        let el = fx.element(&["fade-in-up"], 740.0);
        // Inside the viewport but within the 50px bottom margin band
        let banded = fx.element(&["fade-in-up"], 760.0);
        let mut controller = fx.controller();
        controller.start(fx.body());

        assert!(controller.poll(&VIEWPORT).is_empty());
        assert!(controller.is_watching(el));
        assert!(controller.is_watching(banded));
        assert_eq!(controller.pending_count(), 2);
    }

    #[test]
    fn test_counter_counts_to_target() {
        let fx = Fixture::new();
        let el = fx.counter(Some("250"), 300.0);
        let mut controller = fx.controller();
        controller.start(fx.body());
        controller.poll(&VIEWPORT);

        assert_eq!(fx.text(el), "0");

        fx.scheduler.advance(1000.0);
        let mid: i64 = fx.text(el).parse().unwrap();
        assert!(mid > 0 && mid < 250);

        fx.scheduler.advance(1000.0);
        assert_eq!(fx.text(el), "250");
    }

    #[test]
    fn test_counter_honours_duration() {
        let fx = Fixture::new();
        let el = fx.counter(Some("1200"), 300.0);
        document::write(&fx.doc).set_data(el, "duration", "500");
        let mut controller = fx.controller();
        controller.start(fx.body());
        controller.poll(&VIEWPORT);

        fx.scheduler.advance(500.0);
        assert_eq!(fx.text(el), "1200");
    }

    #[test]
    fn test_counter_exact_for_large_target() {
        let fx = Fixture::new();
        let el = fx.counter(Some("16777217"), 300.0);
        let mut controller = fx.controller();
        controller.start(fx.body());
        controller.poll(&VIEWPORT);

        fx.scheduler.advance(2000.0);
        assert_eq!(fx.text(el), "16777217");
    }

    #[test]
    fn test_bad_counter_does_not_block_batch() {
        let fx = Fixture::new();
        let bad = fx.counter(Some("abc"), 100.0);
        let missing = fx.counter(None, 150.0);
        let fade = fx.element(&["fade-in-left"], 200.0);
        let mut controller = fx.controller();
        controller.start(fx.body());

        assert_eq!(controller.poll(&VIEWPORT), vec![bad, missing, fade]);
        assert_eq!(fx.text(bad), "0");
        assert_eq!(fx.text(missing), "0");

        fx.scheduler.advance(600.0);
        assert!(fx.style(fade).is_at_rest());
        assert_eq!(controller.state(bad), Some(WatchState::Triggered));
    }

    #[test]
    fn test_multiple_markers_apply_together() {
        let fx = Fixture::new();
        let el = fx.element(&["fade-in-up", "counter"], 100.0);
        document::write(&fx.doc).set_data(el, "target", "40");
        let mut controller = fx.controller();
        controller.start(fx.body());
        controller.poll(&VIEWPORT);

        assert_eq!(fx.scheduler.tween_count(), 2);
        fx.scheduler.advance(2000.0);
        assert!(fx.style(el).is_at_rest());
        assert_eq!(fx.text(el), "40");
    }

    #[test]
    fn test_start_is_idempotent() {
        let fx = Fixture::new();
        let el = fx.element(&["fade-in-up"], 100.0);
        let mut controller = fx.controller();
        let body = fx.body();

        assert_eq!(controller.start(body), 1);
        assert_eq!(controller.start(body), 0);
        assert_eq!(controller.poll(&VIEWPORT), vec![el]);

        // Revealed elements are not picked up again
        assert_eq!(controller.start(body), 0);
        assert_eq!(controller.state(el), Some(WatchState::Triggered));
    }

    #[test]
    fn test_start_without_elements() {
        let fx = Fixture::new();
        let mut controller = fx.controller();
        assert_eq!(controller.start(fx.body()), 0);
        assert!(controller.poll(&VIEWPORT).is_empty());
    }

    #[test]
    fn test_stale_entry_is_ignored() {
        let fx = Fixture::new();
        let el = fx.element(&["fade-in-up"], 100.0);
        let mut controller = fx.controller();
        controller.start(fx.body());

        let entry = IntersectionEntry {
            target: el,
            is_intersecting: true,
            intersection_ratio: 1.0,
            bounding_rect: Rect::new(0.0, 100.0, 400.0, 200.0),
        };
        assert_eq!(controller.process_batch(&[entry, entry]), vec![el]);
        assert!(controller.process_batch(&[entry]).is_empty());
        assert_eq!(fx.scheduler.tween_count(), 1);
    }

    #[test]
    fn test_batch_order_is_delivery_order() {
        let fx = Fixture::new();
        let a = fx.element(&["fade-in-up"], 100.0);
        let b = fx.element(&["fade-in-up"], 300.0);
        let mut controller = fx.controller();
        controller.start(fx.body());

        let entry = |target| IntersectionEntry {
            target,
            is_intersecting: true,
            intersection_ratio: 0.5,
            bounding_rect: Rect::ZERO,
        };
        assert_eq!(controller.process_batch(&[entry(b), entry(a)]), vec![b, a]);
    }

    #[test]
    fn test_no_engine_snaps_to_end() {
        let fx = Fixture::new();
        let card = fx.element(&["fade-in-up"], 100.0);
        let counter = fx.counter(Some("75"), 300.0);
        let mut controller = RevealController::new(
            Arc::clone(&fx.doc),
            RevealConfig::default(),
            Capabilities::without_animation(),
        );
        document::write(&fx.doc).record_text_changes();
        controller.start(fx.body());
        controller.poll(&VIEWPORT);

        assert!(fx.style(card).is_at_rest());
        assert_eq!(fx.text(counter), "75");
        assert_eq!(fx.scheduler.tween_count(), 0);

        // No counting frames: every text the counter ever showed is the target
        let shown: Vec<String> = document::write(&fx.doc)
            .take_text_changes()
            .into_iter()
            .filter(|change| change.node == counter)
            .map(|change| change.text)
            .collect();
        assert!(!shown.is_empty());
        assert!(shown.iter().all(|text| text == "75"), "{shown:?}");
    }

    #[test]
    fn test_engine_dropped_after_construction() {
        let fx = Fixture::new();
        let card = fx.element(&["fade-in-up"], 100.0);
        let mut controller = fx.controller();
        controller.start(fx.body());

        let Fixture { scheduler, doc } = fx;
        drop(scheduler);

        controller.poll(&VIEWPORT);
        assert!(document::read(&doc).style(card).unwrap().is_at_rest());
        assert_eq!(controller.state(card), Some(WatchState::Triggered));
    }

    #[test]
    fn test_no_watcher_reveals_everything_immediately() {
        let fx = Fixture::new();
        let below = fx.element(&["fade-in-up"], 5000.0);
        let counter = fx.counter(Some("9"), 6000.0);
        let mut controller = RevealController::new(
            Arc::clone(&fx.doc),
            RevealConfig::default(),
            Capabilities::resolve(Some(fx.scheduler.handle()), false),
        );

        assert_eq!(controller.start(fx.body()), 2);
        assert!(fx.style(below).is_at_rest());
        assert_eq!(fx.text(counter), "9");
        assert_eq!(fx.scheduler.tween_count(), 0);
        assert_eq!(controller.pending_count(), 0);
        assert!(controller.poll(&VIEWPORT).is_empty());
    }

    #[test]
    fn test_stop_leaves_elements_unrevealed() {
        let fx = Fixture::new();
        let el = fx.element(&["fade-in-up"], 100.0);
        let mut controller = fx.controller();
        controller.start(fx.body());
        controller.stop();

        assert!(controller.poll(&VIEWPORT).is_empty());
        assert_eq!(controller.state(el), None);
    }

    #[test]
    fn test_controllers_over_disjoint_subtrees() {
        let fx = Fixture::new();
        let (left, right) = {
            let mut doc = document::write(&fx.doc);
            let body = doc.body();
            (doc.create_element(body, "section"), doc.create_element(body, "section"))
        };
        let a = fx.element(&["fade-in-up"], 100.0);
        let b = fx.element(&["fade-in-up"], 100.0);
        {
            let mut doc = document::write(&fx.doc);
            doc.append_child(left, a).unwrap();
            doc.append_child(right, b).unwrap();
        }

        let mut first = fx.controller();
        let mut second = fx.controller();
        assert_eq!(first.start(left), 1);
        assert_eq!(second.start(right), 1);
        assert_eq!(first.poll(&VIEWPORT), vec![a]);
        assert_eq!(second.poll(&VIEWPORT), vec![b]);
    }
}
