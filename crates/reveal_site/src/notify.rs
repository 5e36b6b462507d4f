//! Toast notifications
//!
//! A notification is a `div.notification.notification-<kind>` appended to
//! the body. It drops in from 50px above, stays for five seconds, then
//! rises out and is removed from the document.

use std::fmt;
use std::sync::Arc;

use reveal_animation::{Easing, Tween};
use reveal_controller::transition::{style_tween, OPACITY, TRANSLATE_Y};
use reveal_controller::Capabilities;
use reveal_core::{document, NodeId, SharedDocument, TimerQueue};
use serde::{Deserialize, Serialize};

/// How long a notification stays before it is dismissed
pub const NOTIFICATION_LIFETIME_MS: u64 = 5000;

const FADE_MS: u32 = 400;
const DROP_OFFSET: f32 = -50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Notifier {
    document: SharedDocument,
    capabilities: Capabilities,
}

impl Notifier {
    pub fn new(document: SharedDocument, capabilities: Capabilities) -> Self {
        Self {
            document,
            capabilities,
        }
    }

    /// Show `message` and schedule its dismissal
    pub fn show(&self, timers: &mut TimerQueue, message: &str, kind: NotificationKind) -> NodeId {
        let node = {
            let mut doc = document::write(&self.document);
            let body = doc.body();
            let node = doc.create_element(body, "div");
            doc.add_class(node, "notification");
            doc.add_class(node, &format!("notification-{kind}"));
            doc.set_text(node, message);
            node
        };
        tracing::debug!("Notifier: showing {} notification {:?}", kind, node);

        self.capabilities.play(self.slide(node, (0.0, 1.0), (DROP_OFFSET, 0.0)));

        let notifier = self.clone();
        timers.schedule(NOTIFICATION_LIFETIME_MS, move |_| notifier.dismiss(node));
        node
    }

    /// Slide a notification out and remove it once it is gone
    pub fn dismiss(&self, node: NodeId) {
        let doc = Arc::clone(&self.document);
        let tween = self
            .slide(node, (1.0, 0.0), (0.0, DROP_OFFSET))
            .on_complete(move || {
                if let Err(err) = document::write(&doc).remove(node) {
                    tracing::debug!("Notifier: notification already gone: {}", err);
                }
            });
        self.capabilities.play(tween);
    }

    fn slide(&self, node: NodeId, opacity: (f32, f32), offset: (f32, f32)) -> Tween {
        let tween = Tween::new(FADE_MS)
            .property(OPACITY, opacity.0, opacity.1)
            .property(TRANSLATE_Y, offset.0, offset.1)
            .easing(Easing::EaseOutQuart);
        style_tween(&self.document, node, tween)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::AnimationScheduler;
    use reveal_core::Document;

    #[test]
    fn test_notification_lifecycle() {
        let scheduler = AnimationScheduler::new();
        let doc = Document::new().into_shared();
        let notifier = Notifier::new(Arc::clone(&doc), Capabilities::full(scheduler.handle()));
        let mut timers = TimerQueue::new();

        let node = notifier.show(&mut timers, "Saved", NotificationKind::Success);
        {
            let doc = document::read(&doc);
            assert!(doc.has_class(node, "notification"));
            assert!(doc.has_class(node, "notification-success"));
            assert_eq!(doc.text(node), Some("Saved"));
            let style = doc.style(node).unwrap();
            assert_eq!(style.opacity, 0.0);
            assert_eq!(style.translate_y, -50.0);
        }

        scheduler.advance(400.0);
        assert!(document::read(&doc).style(node).unwrap().is_at_rest());

        timers.advance(4999);
        assert!(document::read(&doc).is_connected(node));
        timers.advance(1);
        scheduler.advance(200.0);
        assert!(document::read(&doc).is_connected(node));
        scheduler.advance(200.0);
        assert!(!document::read(&doc).is_connected(node));
    }

    #[test]
    fn test_without_engine_removes_on_timer() {
        let doc = Document::new().into_shared();
        let notifier = Notifier::new(Arc::clone(&doc), Capabilities::without_animation());
        let mut timers = TimerQueue::new();

        let node = notifier.show(&mut timers, "Oops", NotificationKind::Error);
        assert!(document::read(&doc).style(node).unwrap().is_at_rest());
        assert_eq!(timers.pending(), 1);

        timers.advance(NOTIFICATION_LIFETIME_MS);
        assert!(!document::read(&doc).is_connected(node));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NotificationKind::default().to_string(), "info");
        assert_eq!(NotificationKind::Error.as_str(), "error");
    }
}
