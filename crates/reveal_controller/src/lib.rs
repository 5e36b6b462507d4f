//! Reveal Controller
//!
//! Scroll-triggered, one-shot entrance effects for marker-classed elements.
//!
//! # Example
//!
//! ```rust
//! use reveal_animation::AnimationScheduler;
//! use reveal_controller::{Capabilities, RevealConfig, RevealController};
//! use reveal_core::{document, Document, Rect, Viewport};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let stat = doc.create_element(body, "span");
//! doc.add_class(stat, "counter");
//! doc.set_data(stat, "target", "250");
//! doc.set_bounds(stat, Rect::new(0.0, 1200.0, 200.0, 40.0));
//! let doc = doc.into_shared();
//!
//! let scheduler = AnimationScheduler::new();
//! let mut controller = RevealController::new(
//!     doc.clone(),
//!     RevealConfig::default(),
//!     Capabilities::full(scheduler.handle()),
//! );
//! controller.start(body);
//!
//! // Not on screen yet
//! assert!(controller.poll(&Viewport::default()).is_empty());
//!
//! // Scrolled into view: counts up to its target
//! assert_eq!(controller.poll(&Viewport::default().scrolled_to(800.0)), vec![stat]);
//! scheduler.advance(2000.0);
//! assert_eq!(document::read(&doc).text(stat), Some("250"));
//! ```

pub mod capability;
pub mod config;
pub mod controller;
pub mod counter;
pub mod transition;

pub use capability::Capabilities;
pub use config::{ConfigError, MarkerClasses, RevealConfig};
pub use controller::{RevealController, RevealKind, WatchState, REVEALED_ATTRIBUTE};
pub use counter::{counter_text, parse_leading_int, CounterError, CounterSpec};
