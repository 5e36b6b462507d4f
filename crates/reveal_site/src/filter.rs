//! Service filter
//!
//! Buttons carrying `data-filter` narrow the `.service-item` list to one
//! `data-category`; the filter `all` shows everything. Matching items pop
//! back in one after another, the rest shrink away and leave the layout.

use std::sync::Arc;

use reveal_animation::{Easing, Stagger, Tween};
use reveal_controller::transition::{style_tween, OPACITY, SCALE};
use reveal_controller::Capabilities;
use reveal_core::{document, Display, NodeId, SharedDocument};

use crate::slots::TweenSlots;

pub const BUTTON_CLASS: &str = "filter-btn";
pub const ITEM_CLASS: &str = "service-item";
pub const ACTIVE_CLASS: &str = "active";
pub const SHOW_ALL: &str = "all";

const SHOW_MS: u32 = 400;
const SHOW_STAGGER_MS: u32 = 50;
const HIDE_MS: u32 = 300;
const SHRUNK: f32 = 0.8;

#[derive(Debug)]
pub struct ServiceFilter {
    document: SharedDocument,
    buttons: Vec<NodeId>,
    items: Vec<NodeId>,
    running: TweenSlots,
}

impl ServiceFilter {
    /// Collect the filter buttons and items present in the document
    pub fn bind(document: SharedDocument) -> Self {
        let (buttons, items) = {
            let doc = document::read(&document);
            (
                doc.query_class(doc.root(), BUTTON_CLASS),
                doc.query_class(doc.root(), ITEM_CLASS),
            )
        };
        Self {
            document,
            buttons,
            items,
            running: TweenSlots::default(),
        }
    }

    /// The filter button containing `node`, if any
    pub fn button_for(&self, node: NodeId) -> Option<NodeId> {
        let doc = document::read(&self.document);
        doc.closest_with_class(node, BUTTON_CLASS)
            .filter(|button| self.buttons.contains(button))
    }

    /// Activate `button` and filter the items by its category
    ///
    /// Returns the applied filter, or `None` if the button has no `data-filter`.
    pub fn apply(&mut self, capabilities: &Capabilities, button: NodeId) -> Option<String> {
        let (filter, matches) = {
            let mut doc = document::write(&self.document);
            let Some(filter) = doc.data(button, "filter").map(str::to_string) else {
                tracing::debug!("ServiceFilter: button {:?} has no data-filter", button);
                return None;
            };

            for &other in &self.buttons {
                doc.remove_class(other, ACTIVE_CLASS);
            }
            doc.add_class(button, ACTIVE_CLASS);

            let matches: Vec<(NodeId, bool)> = self
                .items
                .iter()
                .map(|&item| {
                    let category = doc.data(item, "category");
                    (item, filter == SHOW_ALL || category == Some(filter.as_str()))
                })
                .collect();
            (filter, matches)
        };

        let stagger = Stagger::new(SHOW_STAGGER_MS);
        for (index, (item, visible)) in matches.into_iter().enumerate() {
            if visible {
                self.show(capabilities, item, stagger.delay_for(index));
            } else {
                self.hide(capabilities, item);
            }
        }

        tracing::debug!("ServiceFilter: applied filter {:?}", filter);
        Some(filter)
    }

    fn show(&mut self, capabilities: &Capabilities, item: NodeId, delay_ms: u32) {
        document::write(&self.document)
            .update_style(item, |style| style.display = Display::Visible);
        let tween = Tween::new(SHOW_MS)
            .property(OPACITY, 0.0, 1.0)
            .property(SCALE, SHRUNK, 1.0)
            .delay(delay_ms)
            .easing(Easing::EaseOutQuart);
        self.running
            .play(capabilities, item, style_tween(&self.document, item, tween));
    }

    fn hide(&mut self, capabilities: &Capabilities, item: NodeId) {
        let doc = Arc::clone(&self.document);
        let tween = Tween::new(HIDE_MS)
            .property(OPACITY, 1.0, 0.0)
            .property(SCALE, 1.0, SHRUNK)
            .easing(Easing::EaseOutQuart)
            .on_complete(move || {
                document::write(&doc)
                    .update_style(item, |style| style.display = Display::Hidden);
            });
        self.running
            .play(capabilities, item, style_tween(&self.document, item, tween));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::AnimationScheduler;
    use reveal_core::Document;

    struct Fixture {
        doc: SharedDocument,
        all: NodeId,
        print: NodeId,
        items: Vec<NodeId>,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let button = |doc: &mut Document, filter: &str| {
            let btn = doc.create_element(body, "button");
            doc.add_class(btn, BUTTON_CLASS);
            doc.set_data(btn, "filter", filter);
            btn
        };
        let all = button(&mut doc, "all");
        let print = button(&mut doc, "print");
        doc.add_class(all, ACTIVE_CLASS);

        let items = ["print", "design", "print"]
            .iter()
            .map(|category| {
                let item = doc.create_element(body, "div");
                doc.add_class(item, ITEM_CLASS);
                doc.set_data(item, "category", category);
                item
            })
            .collect();

        Fixture {
            doc: doc.into_shared(),
            all,
            print,
            items,
        }
    }

    fn display(doc: &SharedDocument, node: NodeId) -> Display {
        document::read(doc).style(node).unwrap().display
    }

    #[test]
    fn test_filter_by_category() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let fx = fixture();
        let mut filter = ServiceFilter::bind(fx.doc.clone());

        assert_eq!(filter.apply(&caps, fx.print).as_deref(), Some("print"));
        {
            let doc = document::read(&fx.doc);
            assert!(doc.has_class(fx.print, ACTIVE_CLASS));
            assert!(!doc.has_class(fx.all, ACTIVE_CLASS));
        }

        scheduler.advance(300.0);
        assert_eq!(display(&fx.doc, fx.items[1]), Display::Hidden);
        assert_eq!(display(&fx.doc, fx.items[0]), Display::Visible);

        scheduler.advance(200.0);
        let shown = document::read(&fx.doc).style(fx.items[2]).unwrap();
        assert_eq!(shown.opacity, 1.0);
        assert_eq!(shown.scale, 1.0);
    }

    #[test]
    fn test_show_all_restores_hidden_items() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let fx = fixture();
        let mut filter = ServiceFilter::bind(fx.doc.clone());

        filter.apply(&caps, fx.print);
        scheduler.advance(1000.0);
        assert_eq!(display(&fx.doc, fx.items[1]), Display::Hidden);

        filter.apply(&caps, fx.all);
        assert_eq!(display(&fx.doc, fx.items[1]), Display::Visible);
        scheduler.advance(1000.0);
        assert!(fx
            .items
            .iter()
            .all(|&item| display(&fx.doc, item) == Display::Visible));
    }

    #[test]
    fn test_interrupted_hide_does_not_hide_again() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let fx = fixture();
        let mut filter = ServiceFilter::bind(fx.doc.clone());

        filter.apply(&caps, fx.print);
        scheduler.advance(100.0);
        filter.apply(&caps, fx.all);
        scheduler.advance(1000.0);
        assert_eq!(display(&fx.doc, fx.items[1]), Display::Visible);
    }

    #[test]
    fn test_without_engine_applies_immediately() {
        let fx = fixture();
        let mut filter = ServiceFilter::bind(fx.doc.clone());
        filter.apply(&Capabilities::without_animation(), fx.print);
        assert_eq!(display(&fx.doc, fx.items[1]), Display::Hidden);
        assert_eq!(display(&fx.doc, fx.items[0]), Display::Visible);
    }

    #[test]
    fn test_button_without_filter_is_ignored() {
        let fx = fixture();
        let bare = {
            let mut doc = document::write(&fx.doc);
            let body = doc.body();
            let bare = doc.create_element(body, "button");
            doc.add_class(bare, BUTTON_CLASS);
            bare
        };
        let mut filter = ServiceFilter::bind(fx.doc.clone());
        assert_eq!(filter.button_for(bare), Some(bare));
        assert_eq!(filter.apply(&Capabilities::without_animation(), bare), None);
        assert!(document::read(&fx.doc).has_class(fx.all, ACTIVE_CLASS));
    }
}
