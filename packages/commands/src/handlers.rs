//! # Command Handlers
//!
//! Per-variant mutation and guard semantics, one handler per command type.
//!
//! ## Contract
//!
//! - `can_apply` / `can_undo` re-resolve the command's path and inspect
//!   *current* node state; node state cached at authoring time is never
//!   trusted. Both are total: a vanished target yields `false`, never a
//!   panic or an error.
//! - `apply` / `undo` assume their guard was checked and passed. They do not
//!   re-validate; a vanished target at this point is a caller bug and fails
//!   loudly with [`ApplierError::PathNotFound`].
//! - `can_undo` is true only when the tree is in the post-apply state the
//!   command describes (the new value is present), so undo is a safe
//!   inverse.

use std::collections::HashMap;

use marquee_dom::{editor_node_filter, resolve, Document, NodeId};

use crate::command::{Command, CommandKind, InsertPosition};
use crate::errors::ApplierError;

/// Resolve a command path through the editor node filter.
fn target(doc: &Document, path: &[usize]) -> Option<NodeId> {
    resolve(doc, path, doc.root(), editor_node_filter)
}

/// The apply/undo/can_apply/can_undo quadruple for one command variant.
pub trait CommandHandler: Send + Sync {
    /// The command variant this handler serves.
    fn kind(&self) -> CommandKind;

    /// True iff applying is currently valid and safe.
    fn can_apply(&self, doc: &Document, command: &Command) -> bool;

    /// Perform the mutation. Callers must check [`Self::can_apply`] first.
    fn apply(&self, doc: &mut Document, command: &Command) -> Result<(), ApplierError>;

    /// True iff the tree is in the post-apply state, so undo is a safe
    /// inverse.
    fn can_undo(&self, doc: &Document, command: &Command) -> bool;

    /// Restore pre-apply state. Callers must check [`Self::can_undo`] first.
    fn undo(&self, doc: &mut Document, command: &Command) -> Result<(), ApplierError>;
}

/// Mapping from command-variant tag to handler.
pub struct HandlerRegistry {
    handlers: HashMap<CommandKind, Box<dyn CommandHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Create a registry with the built-in handlers installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SetAttributeHandler));
        registry.register(Box::new(SetTextContentHandler));
        registry.register(Box::new(MoveElementHandler));
        registry
    }

    /// Register a handler under its own kind, replacing any previous entry.
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: CommandKind) -> Option<&dyn CommandHandler> {
        self.handlers.get(&kind).map(Box::as_ref)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// `setAttribute`: guarded attribute replacement.
///
/// The guard compares the current value against the command's recorded
/// `old_value`, which rejects double-apply and stale authoring context. An
/// absent attribute compares as the empty string.
pub struct SetAttributeHandler;

impl CommandHandler for SetAttributeHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::SetAttribute
    }

    fn can_apply(&self, doc: &Document, command: &Command) -> bool {
        let Command::SetAttribute {
            path,
            attribute,
            old_value,
            ..
        } = command
        else {
            return false;
        };
        match target(doc, path) {
            Some(node) => doc.attribute(node, attribute).unwrap_or("") == old_value,
            None => false,
        }
    }

    fn apply(&self, doc: &mut Document, command: &Command) -> Result<(), ApplierError> {
        let Command::SetAttribute {
            path,
            attribute,
            new_value,
            ..
        } = command
        else {
            unreachable!("registry dispatched a non-setAttribute command here");
        };
        let node = target(doc, path).ok_or_else(|| ApplierError::PathNotFound(path.clone()))?;
        doc.set_attribute(node, attribute, new_value);
        Ok(())
    }

    fn can_undo(&self, doc: &Document, command: &Command) -> bool {
        let Command::SetAttribute {
            path,
            attribute,
            new_value,
            ..
        } = command
        else {
            return false;
        };
        match target(doc, path) {
            Some(node) => doc.attribute(node, attribute).unwrap_or("") == new_value,
            None => false,
        }
    }

    fn undo(&self, doc: &mut Document, command: &Command) -> Result<(), ApplierError> {
        let Command::SetAttribute {
            path,
            attribute,
            old_value,
            ..
        } = command
        else {
            unreachable!("registry dispatched a non-setAttribute command here");
        };
        let node = target(doc, path).ok_or_else(|| ApplierError::PathNotFound(path.clone()))?;
        doc.set_attribute(node, attribute, old_value);
        Ok(())
    }
}

/// `setTextContent`: full text replacement.
///
/// Rejected when the target has element children - replacing its text would
/// destroy structure. The rejection is a warning on the diagnostic channel,
/// not an error, so batch callers can continue past it.
pub struct SetTextContentHandler;

impl CommandHandler for SetTextContentHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::SetTextContent
    }

    fn can_apply(&self, doc: &Document, command: &Command) -> bool {
        let Command::SetTextContent { path, .. } = command else {
            return false;
        };
        let Some(node) = target(doc, path) else {
            return false;
        };
        let has_element_children = doc.element_children(node).next().is_some();
        if has_element_children {
            tracing::warn!(
                "not applying setTextContent: node at {:?} has element children",
                path
            );
        }
        !has_element_children
    }

    fn apply(&self, doc: &mut Document, command: &Command) -> Result<(), ApplierError> {
        let Command::SetTextContent { path, new_value, .. } = command else {
            unreachable!("registry dispatched a non-setTextContent command here");
        };
        let node = target(doc, path).ok_or_else(|| ApplierError::PathNotFound(path.clone()))?;
        doc.set_text_content(node, new_value);
        Ok(())
    }

    fn can_undo(&self, doc: &Document, command: &Command) -> bool {
        let Command::SetTextContent { path, new_value, .. } = command else {
            return false;
        };
        match target(doc, path) {
            Some(node) => doc.text_content(node) == *new_value,
            None => false,
        }
    }

    fn undo(&self, doc: &mut Document, command: &Command) -> Result<(), ApplierError> {
        let Command::SetTextContent { path, old_value, .. } = command else {
            unreachable!("registry dispatched a non-setTextContent command here");
        };
        let node = target(doc, path).ok_or_else(|| ApplierError::PathNotFound(path.clone()))?;
        doc.set_text_content(node, old_value);
        Ok(())
    }
}

/// `moveElement`: relocate a node next to a reference node.
///
/// Not undoable: the command records no original position, so there is
/// nothing to restore. `can_undo` is unconditionally false; this is a known
/// limitation of the command schema, not something to patch here.
pub struct MoveElementHandler;

impl CommandHandler for MoveElementHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::MoveElement
    }

    fn can_apply(&self, doc: &Document, command: &Command) -> bool {
        let Command::MoveElement {
            path, target_path, ..
        } = command
        else {
            return false;
        };
        target(doc, path).is_some() && target(doc, target_path).is_some()
    }

    fn apply(&self, doc: &mut Document, command: &Command) -> Result<(), ApplierError> {
        let Command::MoveElement {
            path,
            target_path,
            position,
        } = command
        else {
            unreachable!("registry dispatched a non-moveElement command here");
        };
        let node = target(doc, path).ok_or_else(|| ApplierError::PathNotFound(path.clone()))?;
        let reference_node = target(doc, target_path)
            .ok_or_else(|| ApplierError::PathNotFound(target_path.clone()))?;
        let container = doc
            .parent(reference_node)
            .ok_or_else(|| ApplierError::TargetNotInsertable(target_path.clone()))?;

        // "after" inserts before the reference's current next sibling, which
        // stays correct when the moved node and the reference share a parent.
        let reference = match position {
            InsertPosition::Before => Some(reference_node),
            InsertPosition::After => doc.next_sibling(reference_node),
        };
        doc.insert_before(container, node, reference);
        Ok(())
    }

    fn can_undo(&self, _doc: &Document, _command: &Command) -> bool {
        false
    }

    fn undo(&self, _doc: &mut Document, _command: &Command) -> Result<(), ApplierError> {
        panic!("moveElement commands cannot be undone; can_undo always reports false");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <body><div id="a"><span>hi</span></div><div id="b">x</div></body>
    fn sample() -> Document {
        let mut doc = Document::new("body");
        let root = doc.root();
        let a = doc.create_element("div");
        doc.set_attribute(a, "id", "a");
        let span = doc.create_element("span");
        let hi = doc.create_text("hi");
        doc.append_child(span, hi);
        doc.append_child(a, span);
        doc.append_child(root, a);
        let b = doc.create_element("div");
        doc.set_attribute(b, "id", "b");
        let x = doc.create_text("x");
        doc.append_child(b, x);
        doc.append_child(root, b);
        doc
    }

    fn set_attribute(path: &[usize], attribute: &str, old: &str, new: &str) -> Command {
        Command::SetAttribute {
            path: path.to_vec(),
            attribute: attribute.to_string(),
            old_value: old.to_string(),
            new_value: new.to_string(),
        }
    }

    #[test]
    fn set_attribute_guards_against_stale_state() {
        let doc = sample();
        let handler = SetAttributeHandler;

        assert!(handler.can_apply(&doc, &set_attribute(&[0], "id", "a", "b")));
        // recorded old value no longer matches
        assert!(!handler.can_apply(&doc, &set_attribute(&[0], "id", "z", "b")));
        // target does not resolve
        assert!(!handler.can_apply(&doc, &set_attribute(&[7], "id", "a", "b")));
    }

    #[test]
    fn set_attribute_applies_and_undoes() {
        let mut doc = sample();
        let handler = SetAttributeHandler;
        let command = set_attribute(&[0], "id", "a", "b");

        handler.apply(&mut doc, &command).unwrap();
        let node = target(&doc, &[0]).unwrap();
        assert_eq!(doc.attribute(node, "id"), Some("b"));

        // applied state: can_apply flips off, can_undo flips on
        assert!(!handler.can_apply(&doc, &command));
        assert!(handler.can_undo(&doc, &command));

        handler.undo(&mut doc, &command).unwrap();
        assert_eq!(doc.attribute(node, "id"), Some("a"));
        assert!(handler.can_apply(&doc, &command));
        assert!(!handler.can_undo(&doc, &command));
    }

    #[test]
    fn absent_attribute_compares_as_empty() {
        let mut doc = sample();
        let handler = SetAttributeHandler;
        let command = set_attribute(&[0], "class", "", "card");

        assert!(handler.can_apply(&doc, &command));
        handler.apply(&mut doc, &command).unwrap();
        let node = target(&doc, &[0]).unwrap();
        assert_eq!(doc.attribute(node, "class"), Some("card"));

        // undo writes the empty-string sentinel back, not an absent attribute
        handler.undo(&mut doc, &command).unwrap();
        assert_eq!(doc.attribute(node, "class"), Some(""));
        assert!(handler.can_apply(&doc, &command));
    }

    #[test]
    fn apply_without_guard_fails_loudly() {
        let mut doc = sample();
        let handler = SetAttributeHandler;
        let command = set_attribute(&[9], "id", "a", "b");

        assert_eq!(
            handler.apply(&mut doc, &command),
            Err(ApplierError::PathNotFound(vec![9]))
        );
    }

    #[test]
    fn set_text_content_rejects_element_children() {
        let doc = sample();
        let handler = SetTextContentHandler;

        // div#a has a span child
        let rejected = Command::SetTextContent {
            path: vec![0],
            old_value: "hi".to_string(),
            new_value: "bye".to_string(),
        };
        assert!(!handler.can_apply(&doc, &rejected));

        // the span itself only has a text child
        let allowed = Command::SetTextContent {
            path: vec![0, 0],
            old_value: "hi".to_string(),
            new_value: "bye".to_string(),
        };
        assert!(handler.can_apply(&doc, &allowed));
    }

    #[test]
    fn set_text_content_round_trips() {
        let mut doc = sample();
        let handler = SetTextContentHandler;
        let command = Command::SetTextContent {
            path: vec![0, 0],
            old_value: "hi".to_string(),
            new_value: "bye".to_string(),
        };

        handler.apply(&mut doc, &command).unwrap();
        let span = target(&doc, &[0, 0]).unwrap();
        assert_eq!(doc.text_content(span), "bye");
        assert!(handler.can_undo(&doc, &command));

        handler.undo(&mut doc, &command).unwrap();
        assert_eq!(doc.text_content(span), "hi");
    }

    #[test]
    fn move_element_before_and_after() {
        let mut doc = sample();
        let handler = MoveElementHandler;

        // move div#b before div#a
        let command = Command::MoveElement {
            path: vec![1],
            target_path: vec![0],
            position: InsertPosition::Before,
        };
        assert!(handler.can_apply(&doc, &command));
        handler.apply(&mut doc, &command).unwrap();
        let first = target(&doc, &[0]).unwrap();
        assert_eq!(doc.attribute(first, "id"), Some("b"));

        // and back after it
        let command = Command::MoveElement {
            path: vec![0],
            target_path: vec![1],
            position: InsertPosition::After,
        };
        handler.apply(&mut doc, &command).unwrap();
        let first = target(&doc, &[0]).unwrap();
        assert_eq!(doc.attribute(first, "id"), Some("a"));
    }

    #[test]
    fn move_element_can_apply_requires_both_paths() {
        let doc = sample();
        let handler = MoveElementHandler;

        let command = Command::MoveElement {
            path: vec![0],
            target_path: vec![9],
            position: InsertPosition::Before,
        };
        assert!(!handler.can_apply(&doc, &command));

        let command = Command::MoveElement {
            path: vec![9],
            target_path: vec![0],
            position: InsertPosition::Before,
        };
        assert!(!handler.can_apply(&doc, &command));
    }

    #[test]
    fn move_element_is_never_undoable() {
        let doc = sample();
        let handler = MoveElementHandler;
        let command = Command::MoveElement {
            path: vec![0],
            target_path: vec![1],
            position: InsertPosition::After,
        };
        assert!(!handler.can_undo(&doc, &command));
    }

    #[test]
    #[should_panic(expected = "cannot be undone")]
    fn move_element_undo_is_an_assertion_failure() {
        let mut doc = sample();
        let handler = MoveElementHandler;
        let command = Command::MoveElement {
            path: vec![0],
            target_path: vec![1],
            position: InsertPosition::After,
        };
        let _ = handler.undo(&mut doc, &command);
    }

    #[test]
    fn registry_dispatches_by_kind() {
        let registry = HandlerRegistry::with_defaults();
        assert!(registry.get(CommandKind::SetAttribute).is_some());
        assert!(registry.get(CommandKind::SetTextContent).is_some());
        assert!(registry.get(CommandKind::MoveElement).is_some());

        let empty = HandlerRegistry::new();
        assert!(empty.get(CommandKind::SetAttribute).is_none());
    }
}
