//! # Marquee DOM
//!
//! The document tree the Marquee command layer edits.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ dom: Document tree + path addressing        │
//! │  - Arena-backed mutable tree (NodeId)       │
//! │  - Attribute / text / structure mutations   │
//! │  - Positional paths over filtered children  │
//! └─────────────────────────────────────────────┘
//!                     ↑
//! ┌─────────────────────────────────────────────┐
//! │ commands: guarded command application       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Nodes are owned by the [`Document`] and addressed by copyable [`NodeId`]
//! handles; commands locate their targets with positional [`NodePath`]s
//! resolved through a [`NodeFilter`] so tooling-internal nodes never shift
//! editor-visible indices.

mod document;
mod path;

pub use document::{Document, NodeId, NodeKind};
pub use path::{
    any_node_filter, editor_node_filter, path_of, resolve, NodeFilter, NodePath,
    INTERNAL_ATTRIBUTE,
};
