//! # Path Addressing
//!
//! Positional node addresses: a path is the sequence of child indices that
//! leads from a root to a node, counting only children accepted by a
//! [`NodeFilter`]. Paths are fragile by construction - any structural edit
//! invalidates paths that point past the mutation point - so they are
//! recomputed fresh for every command application and never cached.

use crate::document::{Document, NodeId};

/// Positional address of a node: successive indices into the filtered
/// children of each step, rooted at the document root.
pub type NodePath = Vec<usize>;

/// Predicate deciding which nodes are addressable by paths.
pub type NodeFilter = fn(&Document, NodeId) -> bool;

/// Attribute marking nodes injected by the editor tooling itself.
pub const INTERNAL_ATTRIBUTE: &str = "data-marquee-internal";

/// Default filter for editor paths: element nodes only, excluding elements
/// the tooling injected into the tree.
pub fn editor_node_filter(doc: &Document, node: NodeId) -> bool {
    doc.is_element(node) && doc.attribute(node, INTERNAL_ATTRIBUTE).is_none()
}

/// Filter that accepts every node, for callers addressing the raw tree.
pub fn any_node_filter(_doc: &Document, _node: NodeId) -> bool {
    true
}

/// Resolve `path` against the current tree, walking from `root` and at each
/// segment selecting the nth child among those accepted by `filter`.
///
/// Returns `None` when any segment is out of range. Absence is a normal
/// outcome ("the command's target no longer exists"), not an error.
pub fn resolve(doc: &Document, path: &[usize], root: NodeId, filter: NodeFilter) -> Option<NodeId> {
    let mut current = root;
    for &index in path {
        current = doc
            .children(current)
            .iter()
            .copied()
            .filter(|&child| filter(doc, child))
            .nth(index)?;
    }
    Some(current)
}

/// Compute the path of `node` relative to `root` under `filter` - the
/// inverse of [`resolve`]. Returns `None` when `node` is not reachable from
/// `root` through filtered children (including when `node` itself is
/// filtered out).
pub fn path_of(doc: &Document, node: NodeId, root: NodeId, filter: NodeFilter) -> Option<NodePath> {
    let mut segments = Vec::new();
    let mut current = node;
    while current != root {
        let parent = doc.parent(current)?;
        let index = doc
            .children(parent)
            .iter()
            .copied()
            .filter(|&child| filter(doc, child))
            .position(|child| child == current)?;
        segments.push(index);
        current = parent;
    }
    segments.reverse();
    Some(segments)
}
