//! Error types for the command applier

use crate::command::CommandKind;
use marquee_dom::NodePath;
use thiserror::Error;

/// Hard failures surfaced by [`crate::Applier`] and its handlers.
///
/// Soft conditions - a stale target, a structural conflict - are never
/// errors; they surface as `false` from the `can_apply`/`can_undo` guards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplierError {
    /// No handler is registered for the command's type tag. A configuration
    /// bug upstream, distinct from a validation failure.
    #[error("no handler registered for command type `{0}`")]
    UnknownCommand(CommandKind),

    /// A mutating call reached a path that no longer resolves. The caller
    /// skipped the guard check.
    #[error("command path {0:?} does not resolve to a node")]
    PathNotFound(NodePath),

    /// A move targeted a node with no parent to insert into (the document
    /// root).
    #[error("move target {0:?} has no parent container")]
    TargetNotInsertable(NodePath),
}
