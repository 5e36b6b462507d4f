//! Reveal Core
//!
//! Foundational primitives the reveal controller and the site glue run on:
//!
//! - **Document**: arena-backed element tree with classes, data attributes,
//!   text, layout bounds and an animatable visual style
//! - **Intersection Observer**: threshold/margin based visibility watching
//!   against a scrolling viewport
//! - **Timers**: a virtual-clock one-shot timer queue
//!
//! # Example
//!
//! ```rust
//! use reveal_core::{Document, IntersectionObserver, ObserverOptions, Rect, Viewport};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let card = doc.create_element(body, "div");
//! doc.add_class(card, "fade-in-up");
//! doc.set_bounds(card, Rect::new(0.0, 900.0, 300.0, 200.0));
//!
//! let mut observer = IntersectionObserver::new(ObserverOptions::default());
//! observer.observe(card);
//!
//! let entries = observer.take_records(&doc, &Viewport::new(0.0, 800.0, 1280.0, 800.0));
//! assert!(entries[0].is_intersecting);
//! ```

pub mod document;
pub mod error;
pub mod geometry;
pub mod observer;
pub mod timer;

pub use document::{Display, Document, ElementStyle, NodeId, SharedDocument, TextChange};
pub use error::DocumentError;
pub use geometry::{Point, Rect, Size};
pub use observer::{
    IntersectionEntry, IntersectionObserver, MarginParseError, ObserverOptions, RootMargin,
    Viewport,
};
pub use timer::{TimerCallback, TimerId, TimerQueue};
