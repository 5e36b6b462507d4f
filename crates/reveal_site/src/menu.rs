//! Mobile menu toggle
//!
//! The toggle opens and closes the menu. An open menu also closes when a
//! click lands outside both menu and toggle, or on a link inside the menu.

use reveal_animation::{Easing, Tween};
use reveal_controller::transition::{style_tween, OPACITY};
use reveal_controller::Capabilities;
use reveal_core::{document, NodeId, SharedDocument};

use crate::slots::TweenSlots;

pub const TOGGLE_CLASS: &str = "mobile-menu-toggle";
pub const MENU_CLASS: &str = "mobile-menu";
pub const OPEN_CLASS: &str = "active";

const FADE_MS: u32 = 300;

#[derive(Debug)]
pub struct MobileMenu {
    document: SharedDocument,
    toggle: NodeId,
    menu: NodeId,
    running: TweenSlots,
}

impl MobileMenu {
    /// Bind to the first toggle and menu; both must exist
    pub fn bind(document: SharedDocument) -> Option<Self> {
        let (toggle, menu) = {
            let doc = document::read(&document);
            let root = doc.root();
            (
                doc.query_first_class(root, TOGGLE_CLASS)?,
                doc.query_first_class(root, MENU_CLASS)?,
            )
        };
        Some(Self {
            document,
            toggle,
            menu,
            running: TweenSlots::default(),
        })
    }

    pub fn menu(&self) -> NodeId {
        self.menu
    }

    /// Whether `node` is (inside) the toggle
    pub fn is_toggle_target(&self, node: NodeId) -> bool {
        document::read(&self.document).contains(self.toggle, node)
    }

    pub fn is_open(&self) -> bool {
        document::read(&self.document).has_class(self.menu, OPEN_CLASS)
    }

    /// Whether a click on `node` should close the open menu
    pub fn dismisses_on(&self, node: NodeId) -> bool {
        let doc = document::read(&self.document);
        if !doc.has_class(self.menu, OPEN_CLASS) || doc.contains(self.toggle, node) {
            return false;
        }
        if !doc.contains(self.menu, node) {
            return true;
        }
        doc.closest_with_tag(node, "a")
            .is_some_and(|link| doc.contains(self.menu, link))
    }

    /// Close the menu if it is open; returns whether it was
    pub fn close(&mut self, capabilities: &Capabilities) -> bool {
        if !self.is_open() {
            return false;
        }
        self.toggle(capabilities);
        true
    }

    /// Open or close the menu; returns whether it is now open
    pub fn toggle(&mut self, capabilities: &Capabilities) -> bool {
        let open = document::write(&self.document).toggle_class(self.menu, OPEN_CLASS);
        let (from, to) = if open { (0.0, 1.0) } else { (1.0, 0.0) };
        let tween = Tween::new(FADE_MS)
            .property(OPACITY, from, to)
            .easing(Easing::EaseOutQuart);
        self.running
            .play(capabilities, self.menu, style_tween(&self.document, self.menu, tween));
        tracing::debug!("MobileMenu: {}", if open { "opened" } else { "closed" });
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::AnimationScheduler;
    use reveal_core::Document;

    fn page() -> (SharedDocument, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let toggle = doc.create_element(body, "button");
        doc.add_class(toggle, TOGGLE_CLASS);
        let menu = doc.create_element(body, "nav");
        doc.add_class(menu, MENU_CLASS);
        (doc.into_shared(), toggle, menu)
    }

    #[test]
    fn test_toggle_fades() {
        let scheduler = AnimationScheduler::new();
        let caps = Capabilities::full(scheduler.handle());
        let (doc, toggle, menu) = page();
        let mut mobile = MobileMenu::bind(doc.clone()).unwrap();
        assert!(mobile.is_toggle_target(toggle));
        assert!(!mobile.is_toggle_target(menu));

        assert!(mobile.toggle(&caps));
        assert!(mobile.is_open());
        assert_eq!(document::read(&doc).style(menu).unwrap().opacity, 0.0);
        scheduler.advance(300.0);
        assert_eq!(document::read(&doc).style(menu).unwrap().opacity, 1.0);

        assert!(!mobile.toggle(&caps));
        assert!(!mobile.is_open());
        scheduler.advance(300.0);
        assert_eq!(document::read(&doc).style(menu).unwrap().opacity, 0.0);
    }

    #[test]
    fn test_dismissal_targets() {
        let caps = Capabilities::without_animation();
        let (doc, toggle, menu) = page();
        let (link, label, heading, outside) = {
            let mut d = document::write(&doc);
            let link = d.create_element(menu, "a");
            d.set_attribute(link, "href", "#services");
            let label = d.create_element(link, "span");
            let heading = d.create_element(menu, "h4");
            let body = d.body();
            let outside = d.create_element(body, "section");
            (link, label, heading, outside)
        };
        let mut mobile = MobileMenu::bind(doc.clone()).unwrap();

        // Closed menus ignore everything
        assert!(!mobile.dismisses_on(outside));
        assert!(!mobile.close(&caps));

        mobile.toggle(&caps);
        assert!(mobile.dismisses_on(outside));
        assert!(mobile.dismisses_on(link));
        assert!(mobile.dismisses_on(label));
        assert!(!mobile.dismisses_on(heading));
        assert!(!mobile.dismisses_on(menu));
        assert!(!mobile.dismisses_on(toggle));

        assert!(mobile.close(&caps));
        assert!(!mobile.is_open());
        assert_eq!(document::read(&doc).style(menu).unwrap().opacity, 0.0);
    }

    #[test]
    fn test_bind_requires_both_parts() {
        let mut doc = Document::new();
        let body = doc.body();
        let toggle = doc.create_element(body, "button");
        doc.add_class(toggle, TOGGLE_CLASS);
        assert!(MobileMenu::bind(doc.into_shared()).is_none());
    }
}
