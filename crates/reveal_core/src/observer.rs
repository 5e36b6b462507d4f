//! Intersection observer
//!
//! Watches a set of elements and reports, in batches, when the fraction of an
//! element that lies inside the (margin-adjusted) viewport crosses the
//! configured threshold.
//!
//! The observer does not run on its own. The host calls
//! [`IntersectionObserver::take_records`] after the viewport moves or layout
//! changes, and forwards the returned batch to whoever consumes it:
//!
//! ```rust
//! use reveal_core::{Document, IntersectionObserver, ObserverOptions, Rect, RootMargin, Viewport};
//!
//! let mut doc = Document::new();
//! let el = doc.create_element(doc.body(), "div");
//! doc.set_bounds(el, Rect::new(0.0, 1000.0, 100.0, 100.0));
//!
//! let mut observer = IntersectionObserver::new(ObserverOptions {
//!     threshold: 0.1,
//!     root_margin: "0px 0px -50px 0px".parse::<RootMargin>().unwrap(),
//! });
//! observer.observe(el);
//!
//! // First check always reports the current state
//! let batch = observer.take_records(&doc, &Viewport::new(0.0, 0.0, 1280.0, 800.0));
//! assert_eq!(batch.len(), 1);
//! assert!(!batch[0].is_intersecting);
//!
//! // Nothing changed, nothing reported
//! assert!(observer.take_records(&doc, &Viewport::new(0.0, 10.0, 1280.0, 800.0)).is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Document, NodeId};
use crate::geometry::{Point, Rect};

/// The visible region of the document
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(scroll_x: f32, scroll_y: f32, width: f32, height: f32) -> Self {
        Self {
            scroll_x,
            scroll_y,
            width,
            height,
        }
    }

    /// Viewport rectangle in document coordinates
    pub fn rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Same viewport scrolled to a new vertical offset
    pub fn scrolled_to(&self, scroll_y: f32) -> Self {
        Self { scroll_y, ..*self }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1280.0, 800.0)
    }
}

/// Error parsing a CSS-style margin shorthand
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarginParseError {
    #[error("margin shorthand takes 1 to 4 values, got {0}")]
    Arity(usize),

    #[error("invalid margin value {0:?} (expected pixels, e.g. \"-50px\")")]
    Value(String),
}

/// Per-edge adjustment of the viewport before intersecting, in pixels
///
/// Positive values grow the root rectangle, negative values shrink it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Apply the margin to a root rectangle
    pub fn apply(&self, rect: Rect) -> Rect {
        rect.inflate(self.top, self.right, self.bottom, self.left)
    }
}

fn parse_px(value: &str) -> Result<f32, MarginParseError> {
    let number = value.strip_suffix("px").unwrap_or(value);
    number
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .filter(|v| value.ends_with("px") || *v == 0.0)
        .ok_or_else(|| MarginParseError::Value(value.to_string()))
}

impl FromStr for RootMargin {
    type Err = MarginParseError;

    /// Parse `top [right [bottom [left]]]` with CSS shorthand expansion
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(parse_px)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [vertical, horizontal] => Ok(Self::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            other => Err(MarginParseError::Arity(other.len())),
        }
    }
}

impl TryFrom<String> for RootMargin {
    type Error = MarginParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_string()
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Observer configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Minimum visible fraction (0.0 to 1.0) for an element to count as intersecting
    pub threshold: f32,
    /// Adjustment applied to the viewport before intersecting
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::ZERO,
        }
    }
}

/// One visibility change reported by [`IntersectionObserver::take_records`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    /// Whether the element now meets the threshold
    pub is_intersecting: bool,
    /// Visible fraction of the element's area (0.0 to 1.0)
    pub intersection_ratio: f32,
    pub bounding_rect: Rect,
}

/// Threshold-based visibility watcher
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    /// Observed nodes in observation order, with the last reported state
    observed: IndexMap<NodeId, Option<bool>>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            observed: IndexMap::new(),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Start watching a node; observing an already watched node is a no-op
    pub fn observe(&mut self, node: NodeId) {
        self.observed.entry(node).or_insert(None);
    }

    /// Stop watching a node permanently
    ///
    /// Returns whether the node was being watched.
    pub fn unobserve(&mut self, node: NodeId) -> bool {
        self.observed.shift_remove(&node).is_some()
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observed.contains_key(&node)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Stop watching everything
    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    /// Visible fraction of `bounds` inside `root`
    pub fn intersection_ratio(bounds: &Rect, root: &Rect) -> Option<f32> {
        let hit = bounds.intersection(root)?;
        let area = bounds.area();
        if area == 0.0 {
            // Degenerate elements count as fully visible once they touch the root
            return root.contains(Point::new(bounds.x(), bounds.y())).then_some(1.0);
        }
        Some((hit.area() / area).clamp(0.0, 1.0))
    }

    /// Compute the batch of visibility changes for the given viewport
    ///
    /// Each node is reported on its first check and afterwards only when its
    /// threshold state flips. Disconnected nodes are skipped until they are
    /// attached again.
    pub fn take_records(&mut self, doc: &Document, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let root = self.options.root_margin.apply(viewport.rect());
        let threshold = self.options.threshold;
        let mut batch = Vec::new();

        for (&node, last) in self.observed.iter_mut() {
            if !doc.is_connected(node) {
                continue;
            }
            let Some(bounds) = doc.bounds(node) else {
                continue;
            };

            let ratio = Self::intersection_ratio(&bounds, &root);
            let is_intersecting = ratio.is_some_and(|r| r >= threshold);

            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                batch.push(IntersectionEntry {
                    target: node,
                    is_intersecting,
                    intersection_ratio: ratio.unwrap_or(0.0),
                    bounding_rect: bounds,
                });
            }
        }

        if !batch.is_empty() {
            tracing::trace!(
                "IntersectionObserver: {} change(s) at scroll_y={}",
                batch.len(),
                viewport.scroll_y
            );
        }
        batch
    }
}
