//! # Command Records
//!
//! Serializable edit operations produced by the authoring layer.
//!
//! ## Design Principles
//!
//! 1. **Self-describing**: attribute and text commands carry both the prior
//!    and the intended value, so undo never consults external history
//! 2. **Positional**: targets are addressed by [`NodePath`], recomputed for
//!    every application - never by cached node handles
//! 3. **Transient validity**: a command must be re-validated against current
//!    tree state immediately before apply/undo
//!
//! The wire shape matches the authoring layer's records: a `type` tag plus
//! camelCase fields, e.g.
//! `{"type":"setAttribute","path":[0],"attribute":"id","oldValue":"a","newValue":"b"}`.
//! Unknown `type` or `position` strings fail at deserialization.

use marquee_dom::NodePath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An edit operation against the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Replace an attribute value on the element at `path`.
    ///
    /// An absent attribute is recorded as the empty string, in both
    /// `old_value` and `new_value`.
    #[serde(rename_all = "camelCase")]
    SetAttribute {
        path: NodePath,
        attribute: String,
        old_value: String,
        new_value: String,
    },

    /// Replace the full text content of the node at `path`.
    #[serde(rename_all = "camelCase")]
    SetTextContent {
        path: NodePath,
        old_value: String,
        new_value: String,
    },

    /// Relocate the node at `path` to become a sibling of the node at
    /// `target_path`. Carries no prior-position information and is
    /// therefore not undoable.
    #[serde(rename_all = "camelCase")]
    MoveElement {
        path: NodePath,
        target_path: NodePath,
        position: InsertPosition,
    },
}

/// Where a moved node lands relative to the reference node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    After,
}

/// Bare variant tag, used for handler registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SetAttribute,
    SetTextContent,
    MoveElement,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::SetAttribute { .. } => CommandKind::SetAttribute,
            Command::SetTextContent { .. } => CommandKind::SetTextContent,
            Command::MoveElement { .. } => CommandKind::MoveElement,
        }
    }

    /// Path of the node this command mutates.
    pub fn path(&self) -> &NodePath {
        match self {
            Command::SetAttribute { path, .. }
            | Command::SetTextContent { path, .. }
            | Command::MoveElement { path, .. } => path,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandKind::SetAttribute => "setAttribute",
            CommandKind::SetTextContent => "setTextContent",
            CommandKind::MoveElement => "moveElement",
        })
    }
}
