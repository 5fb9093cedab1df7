//! Non-fatal findings reported during resolution.
//!
//! Every diagnostic is logged through `tracing` when recorded and kept so the
//! caller can decide whether an incomplete model is acceptable.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Two definitions competed for the same name; the first was kept.
    Conflict,
    /// A search index type was declared twice for one attribute.
    DuplicateIndexType,
    /// A referenced type was not found at resolution time.
    UnresolvedReference,
    /// An attribute's index types form no known search classification.
    UnhandledSearchCombination,
    /// A type expected to exist has no definition.
    MissingDefinition,
    /// The inheritance graph loops back on itself.
    InheritanceCycle,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Conflict => write!(f, "conflict"),
            DiagnosticKind::DuplicateIndexType => write!(f, "duplicate index type"),
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved reference"),
            DiagnosticKind::UnhandledSearchCombination => write!(f, "unhandled search combination"),
            DiagnosticKind::MissingDefinition => write!(f, "missing definition"),
            DiagnosticKind::InheritanceCycle => write!(f, "inheritance cycle"),
        }
    }
}

/// A single diagnostic with enough context to act on from a log line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Type the finding belongs to.
    pub owner: String,
    /// Attribute, relationship or type name the finding is about.
    pub subject: String,
    /// Competing value or other detail.
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}.{}: {}",
            self.kind, self.owner, self.subject, self.detail
        )
    }
}

/// Thread-safe diagnostic collector.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a diagnostic.
    pub fn record(
        &self,
        kind: DiagnosticKind,
        owner: impl Into<String>,
        subject: impl Into<String>,
        detail: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            owner: owner.into(),
            subject: subject.into(),
            detail: detail.into(),
        };
        tracing::warn!(
            kind = %diagnostic.kind,
            owner = %diagnostic.owner,
            subject = %diagnostic.subject,
            detail = %diagnostic.detail,
            "resolution diagnostic"
        );
        self.entries.lock().push(diagnostic);
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }

    /// Sorted, de-duplicated copy of everything recorded so far.
    ///
    /// Sorting makes the list independent of the order workers ran in.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        let mut entries = self.entries.lock().clone();
        entries.sort();
        entries.dedup();
        entries
    }
}
