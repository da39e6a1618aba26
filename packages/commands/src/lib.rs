//! # Marquee Commands
//!
//! Guarded command application for the Marquee document editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ authoring layer: records edit commands      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ commands: guarded application + reversal    │
//! │  - Command records (self-describing)        │
//! │  - Handler registry (one per variant)       │
//! │  - Applier façade over one document         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ dom: mutable tree + path addressing         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Guard before mutate**: every apply/undo is preceded by a
//!    `can_apply`/`can_undo` check against *current* tree state, so commands
//!    authored against a drifted tree are rejected instead of corrupting it
//! 2. **Soft vs hard failure**: tree drift and structural conflicts are
//!    `false` from a guard (plus a diagnostic warning), never errors;
//!    unknown command kinds and skipped guards are hard errors
//! 3. **Single-step mutations**: each command applies as one attribute set,
//!    one text replacement, or one reparent - there is no partial state to
//!    roll back
//!
//! ## Usage
//!
//! ```rust,ignore
//! use marquee_commands::{Applier, Command};
//! use marquee_dom::Document;
//!
//! let mut applier = Applier::new(document);
//! let command: Command = serde_json::from_str(record)?;
//!
//! if applier.can_apply(&command) {
//!     applier.apply(&command)?;
//! }
//!
//! // later, from the history manager
//! if applier.can_undo(&command) {
//!     applier.undo(&command)?;
//! }
//! ```

mod applier;
mod command;
mod errors;
mod handlers;

pub use applier::Applier;
pub use command::{Command, CommandKind, InsertPosition};
pub use errors::ApplierError;
pub use handlers::{
    CommandHandler, HandlerRegistry, MoveElementHandler, SetAttributeHandler,
    SetTextContentHandler,
};

// Re-export the tree types callers address commands against
pub use marquee_dom::{Document, NodeId, NodePath};
