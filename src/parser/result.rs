use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of parsing one catalog document
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    /// Records recovered from the document, in document order
    pub items: Vec<T>,
    /// Fragments that were skipped or recovered with losses
    pub diagnostics: Vec<Diagnostic>,
    /// Line count of the normalized text
    pub line_count: usize,
}

impl<T> Parsed<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A fragment the parser skipped or closed early
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Document path as given to the parser
    pub path: String,
    /// 1-indexed line in the document
    pub line: u32,
    pub reason: SkipReason,
    /// The offending line, normalized
    pub text: String,
}

/// Why a fragment did not make it into the bundle intact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Type block with no description lines; dropped
    EmptyTypeBlock,
    /// Type marker with no name; the block is dropped
    UnnamedTypeBlock,
    /// Later block repeating a type name; the first one wins
    DuplicateTypeBlock,
    /// Text before the first type marker; ignored
    OutsideTypeBlock,
    /// Line inside a parameter block matching no parameter grammar; dropped
    UnparsedParameter,
    /// Method block never closed; flushed with the parameters collected so far
    UnterminatedEntry,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyTypeBlock => "empty_type_block",
            Self::UnnamedTypeBlock => "unnamed_type_block",
            Self::DuplicateTypeBlock => "duplicate_type_block",
            Self::OutsideTypeBlock => "outside_type_block",
            Self::UnparsedParameter => "unparsed_parameter",
            Self::UnterminatedEntry => "unterminated_entry",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {} `{}`", self.path, self.line, self.reason, self.text)
    }
}

/// Collects diagnostics for one document
#[derive(Debug)]
pub(crate) struct DiagnosticSink {
    path: String,
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub(crate) fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            entries: Vec::new(),
        }
    }

    /// Record a skip at the 0-based line index `index`
    pub(crate) fn push(&mut self, index: usize, reason: SkipReason, text: &str) {
        let diagnostic = Diagnostic {
            path: self.path.clone(),
            line: (index + 1) as u32,
            reason,
            text: text.to_string(),
        };
        log::debug!("[parser] skipped {}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
