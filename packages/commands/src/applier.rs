//! # Command Applier
//!
//! Façade the history manager talks to: owns the target document and a
//! handler registry, and routes each command to its handler by variant tag.
//!
//! The applier does not validate on `apply`/`undo` - the guard check is the
//! caller's responsibility, performed through the `can_apply`/`can_undo`
//! pass-throughs immediately before the mutating call. What the applier does
//! own is configuration failure: a command whose kind has no registered
//! handler is a hard [`ApplierError::UnknownCommand`], surfaced distinctly
//! from any validation outcome.

use marquee_dom::Document;

use crate::command::Command;
use crate::errors::ApplierError;
use crate::handlers::HandlerRegistry;

/// Applies and reverses commands against a single document.
pub struct Applier {
    document: Document,
    registry: HandlerRegistry,
}

impl Applier {
    /// Create an applier over `document` with the built-in handlers.
    pub fn new(document: Document) -> Self {
        Self::with_registry(document, HandlerRegistry::with_defaults())
    }

    /// Create an applier with an injected handler registry.
    pub fn with_registry(document: Document, registry: HandlerRegistry) -> Self {
        Self { document, registry }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Guard check for [`Self::apply`]. False when the command's target has
    /// drifted, when its preconditions fail, or when no handler is
    /// registered for its kind.
    pub fn can_apply(&self, command: &Command) -> bool {
        match self.registry.get(command.kind()) {
            Some(handler) => handler.can_apply(&self.document, command),
            None => false,
        }
    }

    /// Guard check for [`Self::undo`].
    pub fn can_undo(&self, command: &Command) -> bool {
        match self.registry.get(command.kind()) {
            Some(handler) => handler.can_undo(&self.document, command),
            None => false,
        }
    }

    /// Apply `command` to the document. The caller is expected to have
    /// checked [`Self::can_apply`] on this tree state first.
    pub fn apply(&mut self, command: &Command) -> Result<(), ApplierError> {
        let handler = self
            .registry
            .get(command.kind())
            .ok_or(ApplierError::UnknownCommand(command.kind()))?;
        handler.apply(&mut self.document, command)
    }

    /// Reverse a previously applied `command`. The caller is expected to
    /// have checked [`Self::can_undo`] on this tree state first.
    pub fn undo(&mut self, command: &Command) -> Result<(), ApplierError> {
        let handler = self
            .registry
            .get(command.kind())
            .ok_or(ApplierError::UnknownCommand(command.kind()))?;
        handler.undo(&mut self.document, command)
    }
}
