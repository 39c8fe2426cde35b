//! Core data model for decompiled documents and translation requests.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default naming prefix for synthetic function names in decompiled output.
pub const DEFAULT_REFERENCE_PREFIX: &str = "sub_";

/// Textual identifier of a called function as it appears in decompiled text
/// (a fixed prefix followed by a hexadecimal address, e.g. `sub_18000F2C0`).
///
/// References have no identity beyond the string; two occurrences of the same
/// identifier are the same reference. `Ord` is derived so traversal and
/// output order stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionReference(String);

impl FunctionReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One function's decompiled body after cleaning: formatting tags stripped
/// and blank lines removed. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudocodeDocument {
    lines: Vec<String>,
}

impl PseudocodeDocument {
    /// Build a document from lines that have already been tag-stripped.
    /// Blank lines are dropped here so every stored line carries content.
    pub fn from_cleaned_lines(lines: impl IntoIterator<Item = String>) -> Self {
        Self { lines: lines.into_iter().filter(|l| !l.trim().is_empty()).collect() }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when the cleaned body carries no content at all. An all-blank
    /// helper is treated the same as an unresolved one.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// The primary function's text plus the helper documents collected from it.
///
/// Rendering always places the primary text first; helpers follow in
/// reference order, each preceded by a separator comment naming it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedPseudocode {
    primary: String,
    helpers: Vec<(FunctionReference, PseudocodeDocument)>,
}

impl CombinedPseudocode {
    pub fn new(primary: impl Into<String>) -> Self {
        Self { primary: primary.into(), helpers: Vec::new() }
    }

    /// Append a resolved helper. Callers are expected to have de-duplicated
    /// references already; this does not re-check.
    pub fn push_helper(&mut self, reference: FunctionReference, body: PseudocodeDocument) {
        self.helpers.push((reference, body));
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn helpers(&self) -> &[(FunctionReference, PseudocodeDocument)] {
        &self.helpers
    }

    /// Render the combined document: primary first, then each helper behind
    /// a `// Function: <name>` marker.
    pub fn render(&self) -> String {
        let mut out = self.primary.clone();
        for (reference, body) in &self.helpers {
            out.push_str(&format!("\n\n// Function: {}\n{}", reference, body.text()));
        }
        out
    }
}

/// Everything the dispatcher needs for one outbound translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Model identifier, e.g. `DeepSeek-V3`.
    pub model: String,
    /// Combined pseudocode text (primary plus helpers).
    pub pseudocode: String,
    /// Target language name, e.g. `Rust`.
    pub target_language: String,
    /// Bearer credential for the translation service.
    pub api_key: String,
}

/// Outcome delivered across the worker boundary: exactly one of these is
/// sent per request. Failures carry a human-readable message only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Failed(String),
}
