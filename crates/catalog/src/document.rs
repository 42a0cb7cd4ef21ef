//! # Document Workflow
//!
//! A document moves from draft through moderation to publication:
//!
//! ```text
//!   ┌──────┐ publish ┌────────────┐ publish ┌───────────┐
//!   │Draft │────────▶│ Moderation │────────▶│ Published │
//!   └──────┘         └────────────┘         └───────────┘
//!    ↺ edit           edit: rejected         edit, publish: rejected
//! ```
//!
//! The body only changes through an applied `edit`, and nothing leads back
//! to `Draft` once it is left.

use std::fmt;
use std::sync::Arc;

use behavior_core::{
    CoreError, Observer, OperationSet, Outcome, StateMachine, StateSet, Transition,
    TransitionTable,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentState {
    Draft,
    Moderation,
    Published,
}

impl StateSet for DocumentState {
    fn all() -> &'static [Self] {
        &[
            DocumentState::Draft,
            DocumentState::Moderation,
            DocumentState::Published,
        ]
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentState::Draft => write!(f, "draft"),
            DocumentState::Moderation => write!(f, "moderation"),
            DocumentState::Published => write!(f, "published"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentOp {
    Edit,
    Publish,
}

impl OperationSet for DocumentOp {
    fn all() -> &'static [Self] {
        &[DocumentOp::Edit, DocumentOp::Publish]
    }
}

impl fmt::Display for DocumentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentOp::Edit => write!(f, "edit"),
            DocumentOp::Publish => write!(f, "publish"),
        }
    }
}

pub type DocumentOutcome = Outcome<DocumentState, DocumentOp>;
pub type DocumentTransition = Transition<DocumentState, DocumentOp>;

/// The reference moderation workflow.
pub fn document_table() -> Result<TransitionTable<DocumentState, DocumentOp>, CoreError> {
    use DocumentOp::*;
    use DocumentState::*;

    TransitionTable::builder()
        .allow(Draft, Edit, Draft, "draft updated")
        .allow(Draft, Publish, Moderation, "submitted for review")
        .reject(Moderation, Edit, "editing is locked while under review")
        .allow(Moderation, Publish, Published, "approved and published")
        .reject(Published, Edit, "published documents are immutable")
        .reject(Published, Publish, "already published")
        .build()
}

/// A document whose edits and publication obey [`document_table`].
///
/// # Example
///
/// ```
/// use behavior_catalog::document::{Document, DocumentState};
///
/// let doc = Document::new("release notes").unwrap();
/// assert!(doc.edit("first draft").is_applied());
/// assert!(doc.publish().is_applied());
/// assert!(doc.edit("sneaky change").is_rejected());
/// assert_eq!(doc.state(), DocumentState::Moderation);
/// assert_eq!(doc.body(), "first draft");
/// ```
pub struct Document {
    title: String,
    body: Mutex<String>,
    machine: StateMachine<DocumentState, DocumentOp>,
}

impl Document {
    /// A new draft using the reference workflow.
    ///
    /// The table is checked by [`TransitionTableBuilder::build`] every time,
    /// so an edit to [`document_table`] that leaves a `(state, operation)`
    /// pair uncovered surfaces here as `CoreError::IncompleteTable` rather
    /// than a panic. Use [`Document::with_table`] to build the table once and
    /// share it.
    ///
    /// [`TransitionTableBuilder::build`]: behavior_core::state::TransitionTableBuilder::build
    pub fn new(title: impl Into<String>) -> Result<Self, CatalogError> {
        Ok(Self::with_table(title, Arc::new(document_table()?)))
    }

    /// A new draft sharing an existing table.
    pub fn with_table(
        title: impl Into<String>,
        table: Arc<TransitionTable<DocumentState, DocumentOp>>,
    ) -> Self {
        Self {
            title: title.into(),
            body: Mutex::new(String::new()),
            machine: StateMachine::new(table, DocumentState::Draft),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> String {
        self.body.lock().clone()
    }

    pub fn state(&self) -> DocumentState {
        self.machine.state()
    }

    /// Append `text` to the body if the current state allows editing.
    pub fn edit(&self, text: &str) -> DocumentOutcome {
        let outcome = self.machine.apply_with(DocumentOp::Edit, |_| {
            let mut body = self.body.lock();
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(text);
        });
        if let Outcome::Rejected(rejection) = &outcome {
            tracing::debug!(title = %self.title, reason = %rejection.reason, "edit refused");
        }
        outcome
    }

    pub fn publish(&self) -> DocumentOutcome {
        self.machine.apply(DocumentOp::Publish)
    }

    /// Observe applied transitions. The document holds only a weak reference.
    pub fn subscribe<O>(&self, observer: &Arc<O>)
    where
        O: Observer<DocumentTransition> + 'static,
    {
        self.machine.hub().subscribe(observer);
    }

    pub fn unsubscribe<O: ?Sized>(&self, observer: &Arc<O>) -> usize {
        self.machine.hub().unsubscribe(observer)
    }

    pub fn machine(&self) -> &StateMachine<DocumentState, DocumentOp> {
        &self.machine
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("title", &self.title)
            .field("state", &self.state())
            .finish()
    }
}
