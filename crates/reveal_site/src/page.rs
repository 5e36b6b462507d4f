//! Page driver
//!
//! A [`Page`] owns a document and everything that animates it: the reveal
//! controller, the animation scheduler, the timer queue and the interactive
//! widgets bound at construction. The host feeds it scrolls, clicks and
//! frame ticks.
//!
//! # Example
//!
//! ```rust
//! use reveal_controller::RevealConfig;
//! use reveal_core::{document, Document, Rect, Viewport};
//! use reveal_site::{Page, PageOptions};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let stat = doc.create_element(body, "span");
//! doc.add_class(stat, "counter");
//! doc.set_data(stat, "target", "120");
//! doc.set_bounds(stat, Rect::new(0.0, 1500.0, 200.0, 40.0));
//!
//! let mut page = Page::new(doc, Viewport::default(), RevealConfig::default(), PageOptions::default());
//! assert!(page.load().is_empty());
//!
//! assert_eq!(page.scroll_to(1000.0), vec![stat]);
//! page.frame(2000);
//! assert_eq!(document::read(page.document()).text(stat), Some("120"));
//! ```

use reveal_animation::AnimationScheduler;
use reveal_controller::{Capabilities, RevealConfig, RevealController};
use reveal_core::{document, Document, NodeId, SharedDocument, TimerQueue, Viewport};
use std::sync::{Arc, Mutex};

use crate::cards::ServiceCards;
use crate::contact::{ContactForm, FormError};
use crate::filter::ServiceFilter;
use crate::menu::MobileMenu;
use crate::notify::{NotificationKind, Notifier};
use crate::scroll::{lock_viewport, SharedViewport, SmoothScroll};
use crate::snapshot::{DescriptionError, PageDescription, PageSnapshot};

/// What the host provides to a page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageOptions {
    /// Run transitions on an animation engine; without one they snap to their end
    pub animation: bool,
    /// Watch element visibility; without it every reveal fires at load
    pub watch: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            animation: true,
            watch: true,
        }
    }
}

/// What a click did
#[derive(Clone, Debug, PartialEq)]
pub enum ClickAction {
    Filtered(String),
    Submitted,
    SubmitRejected(FormError),
    MenuToggled { open: bool },
    /// The open menu closed and the click did nothing else
    MenuDismissed,
    Scrolled { to: f32 },
    Ignored,
}

pub struct Page {
    document: SharedDocument,
    viewport: SharedViewport,
    scheduler: Option<AnimationScheduler>,
    timers: TimerQueue,
    capabilities: Capabilities,
    controller: RevealController,
    notifier: Notifier,
    cards: ServiceCards,
    filter: ServiceFilter,
    contact: Option<ContactForm>,
    menu: Option<MobileMenu>,
    scroll: SmoothScroll,
    loaded: bool,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("viewport", &self.viewport())
            .field("now_ms", &self.timers.now_ms())
            .field("controller", &self.controller)
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl Page {
    pub fn new(
        document: Document,
        viewport: Viewport,
        config: RevealConfig,
        options: PageOptions,
    ) -> Self {
        let document = document.into_shared();
        let viewport = Arc::new(Mutex::new(viewport));
        let scheduler = options.animation.then(AnimationScheduler::new);
        let capabilities =
            Capabilities::resolve(scheduler.as_ref().map(AnimationScheduler::handle), options.watch);

        let contact = ContactForm::bind(Arc::clone(&document));
        let menu = MobileMenu::bind(Arc::clone(&document));
        tracing::debug!(
            "Page: contact form {}, mobile menu {}",
            if contact.is_some() { "bound" } else { "absent" },
            if menu.is_some() { "bound" } else { "absent" }
        );

        Self {
            controller: RevealController::new(
                Arc::clone(&document),
                config,
                capabilities.clone(),
            ),
            notifier: Notifier::new(Arc::clone(&document), capabilities.clone()),
            cards: ServiceCards::bind(Arc::clone(&document)),
            filter: ServiceFilter::bind(Arc::clone(&document)),
            scroll: SmoothScroll::new(Arc::clone(&document), Arc::clone(&viewport)),
            contact,
            menu,
            document,
            viewport,
            scheduler,
            timers: TimerQueue::new(),
            capabilities,
            loaded: false,
        }
    }

    /// Build a page from its JSON description
    pub fn from_description(
        description: &PageDescription,
        config: RevealConfig,
        options: PageOptions,
    ) -> Result<Self, DescriptionError> {
        let document = description.build()?;
        Ok(Self::new(document, description.viewport, config, options))
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn viewport(&self) -> Viewport {
        *lock_viewport(&self.viewport)
    }

    pub fn controller(&self) -> &RevealController {
        &self.controller
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn contact_form(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    /// Virtual time elapsed through [`Page::frame`]
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Whether animations or timers are still outstanding
    pub fn is_busy(&self) -> bool {
        self.timers.pending() > 0
            || self
                .scheduler
                .as_ref()
                .is_some_and(AnimationScheduler::has_active_animations)
    }

    /// Run the page's start-up work
    ///
    /// Plays the card entrance, then registers reveal targets and reports
    /// those already in view. Loading twice only picks up new reveal targets.
    pub fn load(&mut self) -> Vec<NodeId> {
        if !self.loaded {
            self.cards.entrance(&self.capabilities);
            self.loaded = true;
        }
        let body = document::read(&self.document).body();
        let registered = self.controller.start(body);
        tracing::debug!("Page: loaded, {} reveal target(s)", registered);
        self.poll()
    }

    /// Jump the viewport to `scroll_y`, stopping any smooth scroll in flight
    pub fn scroll_to(&mut self, scroll_y: f32) -> Vec<NodeId> {
        self.scroll.cancel(&self.capabilities);
        lock_viewport(&self.viewport).scroll_y = scroll_y.max(0.0);
        self.poll()
    }

    /// Advance animations and timers by `dt_ms`, then check visibility
    pub fn frame(&mut self, dt_ms: u32) -> Vec<NodeId> {
        if let Some(scheduler) = &self.scheduler {
            scheduler.advance(dt_ms as f32);
        }
        let fired = self.timers.advance(u64::from(dt_ms));
        if fired > 0 {
            tracing::trace!("Page: {} timer(s) fired at {}ms", fired, self.timers.now_ms());
        }
        self.poll()
    }

    /// Run frames of `step_ms` until nothing is pending or `limit_ms` has passed
    pub fn settle(&mut self, step_ms: u32, limit_ms: u64) -> Vec<NodeId> {
        let step_ms = step_ms.max(1);
        let deadline = self.now_ms() + limit_ms;
        let mut revealed = Vec::new();
        while self.is_busy() && self.now_ms() < deadline {
            revealed.extend(self.frame(step_ms));
        }
        revealed
    }

    /// Dispatch a click on `node`
    ///
    /// A click outside the open mobile menu, or on a link inside it, closes
    /// the menu before anything else handles the click.
    pub fn click(&mut self, node: NodeId) -> ClickAction {
        let dismissed = self
            .menu
            .as_mut()
            .filter(|menu| menu.dismisses_on(node))
            .is_some_and(|menu| menu.close(&self.capabilities));
        if dismissed {
            tracing::debug!("Page: mobile menu dismissed by click on {:?}", node);
        }

        if let Some(button) = self.filter.button_for(node) {
            return match self.filter.apply(&self.capabilities, button) {
                Some(filter) => ClickAction::Filtered(filter),
                None => ClickAction::Ignored,
            };
        }

        if let Some(form) = self.contact.as_ref().filter(|form| form.is_submit_target(node)) {
            return match form.submit(&mut self.timers, &self.notifier) {
                Ok(()) => ClickAction::Submitted,
                Err(err) => {
                    tracing::debug!("Page: submission rejected: {}", err);
                    ClickAction::SubmitRejected(err)
                }
            };
        }

        if let Some(menu) = self.menu.as_mut().filter(|menu| menu.is_toggle_target(node)) {
            let open = menu.toggle(&self.capabilities);
            return ClickAction::MenuToggled { open };
        }

        if let Some(target) = self.scroll.anchor_target(node) {
            if let Some(to) = self.scroll.scroll_to(&self.capabilities, target) {
                return ClickAction::Scrolled { to };
            }
        }

        if dismissed {
            ClickAction::MenuDismissed
        } else {
            ClickAction::Ignored
        }
    }

    /// Pointer entered (or left) `node`
    pub fn hover(&mut self, node: NodeId, entered: bool) -> bool {
        self.cards.hover(&self.capabilities, node, entered)
    }

    pub fn notify(&mut self, message: &str, kind: NotificationKind) -> NodeId {
        self.notifier.show(&mut self.timers, message, kind)
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let doc = document::read(&self.document);
        PageSnapshot::capture(&doc, self.viewport(), self.now_ms())
    }

    fn poll(&mut self) -> Vec<NodeId> {
        let viewport = self.viewport();
        self.controller.poll(&viewport)
    }
}
