//! In-memory document model
//!
//! An arena of element nodes addressed by [`NodeId`]. Nodes are never freed:
//! removing a node only detaches its subtree, so a stale id keeps pointing at
//! a disconnected element and mutating it is harmless, the same way a script
//! can still touch a node it removed from the page.
//!
//! Every element carries:
//! - a tag name, an optional `id` (indexed) and a class list
//! - ordered attributes (`data-*` attributes are read through [`Document::data`])
//! - text content
//! - layout bounds in document coordinates
//! - an [`ElementStyle`] that transitions animate

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::geometry::Rect;

/// Document shared between the controller and animation callbacks
pub type SharedDocument = Arc<RwLock<Document>>;

/// Read-lock a shared document, recovering from a poisoned lock
pub fn read(doc: &SharedDocument) -> RwLockReadGuard<'_, Document> {
    doc.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write-lock a shared document, recovering from a poisoned lock
pub fn write(doc: &SharedDocument) -> RwLockWriteGuard<'_, Document> {
    doc.write().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a node in a [`Document`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether an element takes part in rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Visible,
    Hidden,
}

/// Animatable visual state of an element
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub opacity: f32,
    /// Horizontal offset in pixels
    pub translate_x: f32,
    /// Vertical offset in pixels
    pub translate_y: f32,
    pub scale: f32,
    pub display: Display,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            display: Display::Visible,
        }
    }
}

impl ElementStyle {
    /// Resting state of a revealed element: fully opaque, no offset
    pub fn is_at_rest(&self) -> bool {
        self.opacity == 1.0 && self.translate_x == 0.0 && self.translate_y == 0.0
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: IndexMap<String, String>,
    text: String,
    bounds: Rect,
    style: ElementStyle,
}

impl Element {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attrs: IndexMap::new(),
            text: String::new(),
            bounds: Rect::ZERO,
            style: ElementStyle::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    connected: bool,
    element: Element,
}

/// A text write recorded while text recording is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub node: NodeId,
    pub text: String,
}

/// Element tree with a fixed `html > body` spine
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    id_index: FxHashMap<String, NodeId>,
    text_log: Option<Vec<TextChange>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only `html` and `body`
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                connected: true,
                element: Element::new("html"),
            }],
            root: NodeId(0),
            body: NodeId(0),
            id_index: FxHashMap::default(),
            text_log: None,
        };
        doc.body = doc.create_element(doc.root, "body");
        doc
    }

    /// Wrap the document for sharing with animation callbacks
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of nodes ever created, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node.0)
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.node(node).map(|n| &n.element)
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.node_mut(node).map(|n| &mut n.element)
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Create an element and append it to `parent`
    ///
    /// An unknown parent leaves the element detached.
    pub fn create_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        let id = self.create_detached(tag_name);
        if let Err(err) = self.append_child(parent, id) {
            tracing::warn!("create_element: {}", err);
        }
        id
    }

    /// Create an element that is not yet part of the tree
    pub fn create_detached(&mut self, tag_name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            connected: false,
            element: Element::new(tag_name),
        });
        id
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        if self.node(parent).is_none() {
            return Err(DocumentError::UnknownNode(parent));
        }
        if self.node(child).is_none() {
            return Err(DocumentError::UnknownNode(child));
        }
        if self.contains(child, parent) {
            return Err(DocumentError::Cycle { parent, child });
        }

        self.detach(child);

        let connected = self.node(parent).is_some_and(|n| n.connected);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        self.set_connected(child, connected);
        Ok(())
    }

    /// Detach a node (and its subtree) from the document
    pub fn remove(&mut self, node: NodeId) -> Result<(), DocumentError> {
        let Some(n) = self.node(node) else {
            return Err(DocumentError::UnknownNode(node));
        };
        if node == self.root {
            return Err(DocumentError::Cycle {
                parent: node,
                child: node,
            });
        }
        if n.parent.is_none() {
            return Err(DocumentError::Removed(node));
        }
        self.detach(node);
        self.set_connected(node, false);
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.node(node).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|&c| c != node);
            }
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
    }

    fn set_connected(&mut self, node: NodeId, connected: bool) {
        for id in self.subtree(node) {
            if let Some(n) = self.node_mut(id) {
                n.connected = connected;
            }
            let dom_id = self.element(id).and_then(|e| e.id.clone());
            if let Some(dom_id) = dom_id {
                if connected {
                    self.id_index.insert(dom_id, id);
                } else if self.id_index.get(&dom_id) == Some(&id) {
                    self.id_index.remove(&dom_id);
                }
            }
        }
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.connected)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// `node` followed by all of its descendants, in document order
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        if self.node(node).is_none() {
            return result;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Connected elements under `root` (inclusive) carrying any of `classes`, in document order
    pub fn query_class_any(&self, root: NodeId, classes: &[&str]) -> Vec<NodeId> {
        self.subtree(root)
            .into_iter()
            .filter(|&id| self.is_connected(id))
            .filter(|&id| classes.iter().any(|class| self.has_class(id, class)))
            .collect()
    }

    /// Connected elements under `root` (inclusive) carrying `class`
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.query_class_any(root, &[class])
    }

    /// First connected element under `root` carrying `class`
    pub fn query_first_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.subtree(root)
            .into_iter()
            .find(|&id| self.is_connected(id) && self.has_class(id, class))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Nearest inclusive ancestor carrying `class`
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.has_class(id, class) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Nearest inclusive ancestor with the given tag name
    pub fn closest_with_tag(&self, node: NodeId, tag_name: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.tag_name(id) == Some(tag_name) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    // =========================================================================
    // Attributes and classes
    // =========================================================================

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    /// Set an attribute; `id` and `class` update the id index and class list
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        match name {
            "id" => self.set_id(node, value),
            "class" => {
                if let Some(el) = self.element_mut(node) {
                    el.classes = value.split_whitespace().map(str::to_string).collect();
                }
            }
            _ => {
                if let Some(el) = self.element_mut(node) {
                    el.attrs.insert(name.to_string(), value.to_string());
                }
            }
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let el = self.element(node)?;
        match name {
            "id" => el.id.as_deref(),
            _ => el.attrs.get(name).map(String::as_str),
        }
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if name == "id" {
            let old = self.element_mut(node).and_then(|el| el.id.take());
            if let Some(old) = old {
                if self.id_index.get(&old) == Some(&node) {
                    self.id_index.remove(&old);
                }
            }
        } else if let Some(el) = self.element_mut(node) {
            el.attrs.shift_remove(name);
        }
    }

    fn set_id(&mut self, node: NodeId, value: &str) {
        self.remove_attribute(node, "id");
        let connected = self.is_connected(node);
        if let Some(el) = self.element_mut(node) {
            el.id = Some(value.to_string());
        } else {
            return;
        }
        if connected {
            #[cfg(debug_assertions)]
            {
                if self.id_index.contains_key(value) {
                    tracing::warn!("Duplicate element id registered: {}", value);
                }
            }
            self.id_index.insert(value.to_string(), node);
        }
    }

    /// Read a `data-<key>` attribute
    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .get(&format!("data-{key}"))
            .map(String::as_str)
    }

    /// Write a `data-<key>` attribute
    pub fn set_data(&mut self, node: NodeId, key: &str, value: &str) {
        self.set_attribute(node, &format!("data-{key}"), value);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|el| el.classes.as_slice())
            .unwrap_or(&[])
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.has_class(node, class)
        }
    }

    // =========================================================================
    // Text, bounds, style
    // =========================================================================

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.text.as_str())
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        let text = text.into();
        if let Some(log) = self.text_log.as_mut() {
            if self.nodes.get(node.0).is_some() {
                log.push(TextChange {
                    node,
                    text: text.clone(),
                });
            }
        }
        if let Some(el) = self.element_mut(node) {
            el.text = text;
        }
    }

    /// Start keeping every text write until [`Document::take_text_changes`]
    pub fn record_text_changes(&mut self) {
        self.text_log.get_or_insert_with(Vec::new);
    }

    /// Text writes recorded so far, oldest first; recording stays on
    pub fn take_text_changes(&mut self) -> Vec<TextChange> {
        self.text_log.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.element(node).map(|el| el.bounds)
    }

    pub fn set_bounds(&mut self, node: NodeId, bounds: Rect) {
        if let Some(el) = self.element_mut(node) {
            el.bounds = bounds;
        }
    }

    pub fn style(&self, node: NodeId) -> Option<ElementStyle> {
        self.element(node).map(|el| el.style)
    }

    pub fn set_style(&mut self, node: NodeId, style: ElementStyle) {
        if let Some(el) = self.element_mut(node) {
            el.style = style;
        }
    }

    /// Apply a closure to an element's style
    pub fn update_style<F>(&mut self, node: NodeId, f: F)
    where
        F: FnOnce(&mut ElementStyle),
    {
        if let Some(el) = self.element_mut(node) {
            f(&mut el.style);
        }
    }
}
