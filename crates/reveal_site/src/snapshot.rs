//! Page descriptions and snapshots.
//!
//! A [`PageDescription`] is the JSON form of a page: a viewport plus a tree
//! of elements with their classes, attributes, text and layout bounds. A
//! [`PageSnapshot`] is the reverse trip, capturing the state of every
//! element after the page has run.

use std::collections::BTreeMap;

use reveal_core::{Document, ElementStyle, NodeId, Rect, Viewport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading a page description.
#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("invalid page description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("element #{0} declared twice")]
    DuplicateId(String),
}

/// A page to load, as read from JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDescription {
    /// Initial viewport; defaults to 1280x800 at the top of the page.
    pub viewport: Viewport,
    /// Children of `body`.
    pub elements: Vec<ElementDescription>,
}

/// One element and its subtree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDescription {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Raw attributes, `data-*` included.
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    /// Layout bounds in document coordinates.
    pub bounds: Option<Rect>,
    pub children: Vec<ElementDescription>,
}

impl PageDescription {
    pub fn from_json(source: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Build the document tree under `body`.
    pub fn build(&self) -> Result<Document, DescriptionError> {
        let mut doc = Document::new();
        let body = doc.body();
        for element in &self.elements {
            element.build_into(&mut doc, body)?;
        }
        Ok(doc)
    }
}

impl ElementDescription {
    fn build_into(&self, doc: &mut Document, parent: NodeId) -> Result<NodeId, DescriptionError> {
        let tag = if self.tag.is_empty() { "div" } else { &self.tag };
        let node = doc.create_element(parent, tag);

        if let Some(id) = &self.id {
            if doc.get_element_by_id(id).is_some() {
                return Err(DescriptionError::DuplicateId(id.clone()));
            }
            doc.set_attribute(node, "id", id);
        }
        for class in &self.classes {
            doc.add_class(node, class);
        }
        for (name, value) in &self.attributes {
            doc.set_attribute(node, name, value);
        }
        if let Some(text) = &self.text {
            doc.set_text(node, text.as_str());
        }
        if let Some(bounds) = self.bounds {
            doc.set_bounds(node, bounds);
        }

        for child in &self.children {
            child.build_into(doc, node)?;
        }
        Ok(node)
    }
}

/// The state of a page at a point in time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Virtual time of the snapshot in milliseconds.
    pub time_ms: u64,
    pub viewport: Viewport,
    /// Connected elements below `body`, in document order.
    pub elements: Vec<ElementSnapshot>,
}

/// A snapshot of a single element.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub node: usize,
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    pub style: ElementStyle,
    /// Whether the reveal controller has fired for this element.
    pub revealed: bool,
}

impl PageSnapshot {
    pub fn capture(doc: &Document, viewport: Viewport, time_ms: u64) -> Self {
        let body = doc.body();
        let elements = doc
            .subtree(body)
            .into_iter()
            .filter(|&node| node != body && doc.is_connected(node))
            .map(|node| ElementSnapshot {
                node: node.index(),
                tag: doc.tag_name(node).unwrap_or_default().to_string(),
                id: doc.attribute(node, "id").map(str::to_string),
                classes: doc.classes(node).to_vec(),
                text: doc.text(node).unwrap_or_default().to_string(),
                style: doc.style(node).unwrap_or_default(),
                revealed: doc.has_attribute(node, reveal_controller::REVEALED_ATTRIBUTE),
            })
            .collect();

        Self {
            time_ms,
            viewport,
            elements,
        }
    }

    /// Find an element by its `id` attribute.
    pub fn get(&self, id: &str) -> Option<&ElementSnapshot> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
