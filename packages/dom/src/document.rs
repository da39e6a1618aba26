//! # Document Tree
//!
//! Arena-backed mutable tree that edit commands operate on.
//!
//! A [`Document`] owns every node it contains; nodes are addressed by
//! [`NodeId`], a copyable index into the arena. Structural state (parent,
//! ordered children) lives on the arena entry, node payload lives in
//! [`NodeKind`]. Callers never hold references into the tree across
//! mutations - they hold `NodeId`s and re-read.
//!
//! ## Mutation surface
//!
//! The write surface is deliberately small: set/remove attribute, replace
//! text content, and [`Document::insert_before`] (which doubles as "move",
//! since it detaches the node from its current parent first). Every write is
//! a single structural step, so a caller observing the tree between commands
//! never sees a half-applied state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle to a node in a [`Document`] arena.
///
/// Ids are only meaningful for the document that created them. They stay
/// valid for the life of the document - removal detaches a node but never
/// reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

/// Node payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Element with a tag name and string attributes.
    Element {
        tag: String,
        attributes: HashMap<String, String>,
    },

    /// Text node.
    Text { content: String },

    /// Comment node.
    Comment { content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create a document whose root is an element with the given tag.
    pub fn new(root_tag: impl Into<String>) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = doc.alloc(NodeKind::Element {
            tag: root_tag.into(),
            attributes: HashMap::new(),
        });
        doc.root = root;
        doc
    }

    /// The document root. Cannot be detached or moved.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.into(),
            attributes: HashMap::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text {
            content: content.into(),
        })
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment {
            content: content.into(),
        })
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Element { .. })
    }

    /// Tag name, for element nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Ordered children of `node`.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Children of `node` that are element nodes.
    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
    }

    /// The sibling immediately after `node`, if any.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|&child| child == node)?;
        siblings.get(index + 1).copied()
    }

    /// Attribute value on an element, `None` when absent (or when `node` is
    /// not an element).
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// Concatenated text of `node` and its descendants. For a text or
    /// comment node this is its own content.
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text { content } | NodeKind::Comment { content } => content.clone(),
            NodeKind::Element { .. } => {
                let mut out = String::new();
                self.collect_text(node, &mut out);
                out
            }
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        for &child in &self.nodes[node.0].children {
            match &self.nodes[child.0].kind {
                NodeKind::Text { content } => out.push_str(content),
                NodeKind::Element { .. } => self.collect_text(child, out),
                NodeKind::Comment { .. } => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Set an attribute on an element node.
    ///
    /// Panics if `node` is not an element - attributes only exist on
    /// elements, and handing a text node here is a caller bug.
    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.into(), value.into());
            }
            _ => panic!("set_attribute called on a non-element node"),
        }
    }

    /// Remove an attribute, returning the previous value if it was present.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => attributes.remove(name),
            _ => None,
        }
    }

    /// Replace the full text content of `node`.
    ///
    /// On an element this drops all existing children and installs a single
    /// text child (none for the empty string). On a text or comment node it
    /// rewrites the content in place.
    pub fn set_text_content(&mut self, node: NodeId, content: impl Into<String>) {
        let content = content.into();
        if let NodeKind::Text { content: existing } | NodeKind::Comment { content: existing } =
            &mut self.nodes[node.0].kind
        {
            *existing = content;
            return;
        }

        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        if !content.is_empty() {
            let text = self.create_text(content);
            self.nodes[text.0].parent = Some(node);
            self.nodes[node.0].children.push(text);
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// current parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `node` into `container` immediately before `reference`, or as
    /// the last child when `reference` is `None`. The node is detached from
    /// its current parent first, so this is also the move primitive.
    ///
    /// Inserting a node before itself is a no-op (the node is already where
    /// it would end up). Panics if `reference` is not a child of
    /// `container`, if `node` is the document root, or if the insertion
    /// would place a node inside its own subtree - all caller bugs, not
    /// recoverable runtime conditions.
    pub fn insert_before(&mut self, container: NodeId, node: NodeId, reference: Option<NodeId>) {
        if reference == Some(node) {
            return;
        }
        assert!(node != self.root, "the document root cannot be moved");
        assert!(
            !self.is_ancestor(node, container),
            "insert_before would create a cycle"
        );

        self.detach(node);

        let children = &mut self.nodes[container.0].children;
        let index = match reference {
            Some(reference) => children
                .iter()
                .position(|&child| child == reference)
                .expect("reference node is not a child of the container"),
            None => children.len(),
        };
        children.insert(index, node);
        self.nodes[node.0].parent = Some(container);
    }

    /// Detach `node` from its parent, leaving it (and its subtree) alive in
    /// the arena. No-op for nodes that are already detached.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0]
                .children
                .retain(|&child| child != node);
        }
    }

    /// True when `node` is `other` or one of its ancestors.
    fn is_ancestor(&self, node: NodeId, other: NodeId) -> bool {
        let mut current = Some(other);
        while let Some(id) = current {
            if id == node {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Compact single-line HTML-ish rendering of the tree, for tests and
    /// diagnostics. Attributes are emitted in sorted order so the output is
    /// stable.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(self.root, &mut out);
        out
    }

    fn render(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                let mut names: Vec<&String> = attributes.keys().collect();
                names.sort();
                for name in names {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(&attributes[name]));
                    out.push('"');
                }
                out.push('>');
                for &child in &self.nodes[node.0].children {
                    self.render(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Text { content } => out.push_str(&escape(content)),
            NodeKind::Comment { content } => {
                out.push_str("<!--");
                out.push_str(content);
                out.push_str("-->");
            }
        }
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
