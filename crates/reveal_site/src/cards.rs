//! Service cards
//!
//! Cards rise into place one after another when the page loads and grow
//! slightly while hovered.

use reveal_animation::{Easing, Stagger, Tween};
use reveal_controller::transition::{style_tween, OPACITY, SCALE, TRANSLATE_Y};
use reveal_controller::Capabilities;
use reveal_core::{document, NodeId, SharedDocument};

use crate::slots::TweenSlots;

pub const CARD_CLASS: &str = "service-card";

const ENTRANCE_MS: u32 = 600;
const ENTRANCE_STAGGER_MS: u32 = 100;
const ENTRANCE_OFFSET: f32 = 30.0;
const HOVER_MS: u32 = 300;
const HOVER_SCALE: f32 = 1.05;

#[derive(Debug)]
pub struct ServiceCards {
    document: SharedDocument,
    cards: Vec<NodeId>,
    entrance: TweenSlots,
    hover: TweenSlots,
}

impl ServiceCards {
    /// Collect every card in the document
    pub fn bind(document: SharedDocument) -> Self {
        let cards = {
            let doc = document::read(&document);
            doc.query_class(doc.root(), CARD_CLASS)
        };
        Self {
            document,
            cards,
            entrance: TweenSlots::default(),
            hover: TweenSlots::default(),
        }
    }

    pub fn cards(&self) -> &[NodeId] {
        &self.cards
    }

    /// Play the staggered load-in of all cards
    ///
    /// The entrance only touches opacity and offset, so it keeps running
    /// under a hover, which only touches scale.
    pub fn entrance(&mut self, capabilities: &Capabilities) {
        let stagger = Stagger::new(ENTRANCE_STAGGER_MS);
        for (index, &card) in self.cards.iter().enumerate() {
            let tween = Tween::new(ENTRANCE_MS)
                .property(OPACITY, 0.0, 1.0)
                .property(TRANSLATE_Y, ENTRANCE_OFFSET, 0.0)
                .delay(stagger.delay_for(index))
                .easing(Easing::EaseOutQuart);
            self.entrance
                .play(capabilities, card, style_tween(&self.document, card, tween));
        }
        tracing::debug!("ServiceCards: entrance for {} card(s)", self.cards.len());
    }

    /// Pointer entered or left `node`
    ///
    /// Returns false when `node` is not inside a card.
    pub fn hover(&mut self, capabilities: &Capabilities, node: NodeId, entered: bool) -> bool {
        let (card, from) = {
            let doc = document::read(&self.document);
            let Some(card) = doc.closest_with_class(node, CARD_CLASS) else {
                return false;
            };
            let from = doc.style(card).map_or(1.0, |style| style.scale);
            (card, from)
        };

        let to = if entered { HOVER_SCALE } else { 1.0 };
        let tween = Tween::new(HOVER_MS)
            .property(SCALE, from, to)
            .easing(Easing::EaseOutQuart);
        self.hover
            .play(capabilities, card, style_tween(&self.document, card, tween));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::AnimationScheduler;
    use reveal_core::Document;

    fn page(count: usize) -> (SharedDocument, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let cards = (0..count)
            .map(|_| {
                let card = doc.create_element(body, "div");
                doc.add_class(card, CARD_CLASS);
                card
            })
            .collect();
        (doc.into_shared(), cards)
    }

    #[test]
    fn test_entrance_is_staggered() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let (doc, nodes) = page(3);
        let mut cards = ServiceCards::bind(doc.clone());
        assert_eq!(cards.cards(), nodes.as_slice());

        cards.entrance(&caps);
        for &card in &nodes {
            let style = document::read(&doc).style(card).unwrap();
            assert_eq!(style.opacity, 0.0);
            assert_eq!(style.translate_y, 30.0);
        }

        scheduler.advance(600.0);
        assert!(document::read(&doc).style(nodes[0]).unwrap().is_at_rest());
        assert!(!document::read(&doc).style(nodes[2]).unwrap().is_at_rest());

        scheduler.advance(200.0);
        assert!(document::read(&doc).style(nodes[2]).unwrap().is_at_rest());
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_entrance_without_engine() {
        let (doc, nodes) = page(2);
        let mut cards = ServiceCards::bind(doc.clone());
        cards.entrance(&Capabilities::without_animation());
        assert!(nodes
            .iter()
            .all(|&card| document::read(&doc).style(card).unwrap().is_at_rest()));
    }

    #[test]
    fn test_hover_scales_card() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let (doc, nodes) = page(1);
        let inner = document::write(&doc).create_element(nodes[0], "h3");
        let mut cards = ServiceCards::bind(doc.clone());

        assert!(cards.hover(&caps, inner, true));
        scheduler.advance(300.0);
        assert_eq!(document::read(&doc).style(nodes[0]).unwrap().scale, 1.05);

        assert!(cards.hover(&caps, nodes[0], false));
        scheduler.advance(300.0);
        assert_eq!(document::read(&doc).style(nodes[0]).unwrap().scale, 1.0);

        let body = document::read(&doc).body();
        assert!(!cards.hover(&caps, body, true));
    }

    #[test]
    fn test_hover_during_entrance() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let (doc, nodes) = page(2);
        let mut cards = ServiceCards::bind(doc.clone());

        cards.entrance(&caps);
        scheduler.advance(100.0);
        assert!(cards.hover(&caps, nodes[0], true));
        assert!(cards.hover(&caps, nodes[1], true));
        scheduler.advance(5000.0);

        for &card in &nodes {
            let style = document::read(&doc).style(card).unwrap();
            assert_eq!(style.opacity, 1.0);
            assert_eq!(style.translate_y, 0.0);
            assert_eq!(style.scale, 1.05);
        }
        assert!(!scheduler.has_active_animations());
    }
}
