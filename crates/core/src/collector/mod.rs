//! Pseudocode collector.
//!
//! Given the decompiled text of a primary function, scan it for textual
//! references to other functions, decompile each referenced function through
//! the host, and assemble one combined document: primary text first, then
//! each resolved helper behind a `// Function: <name>` marker.
//!
//! Only the primary text is scanned for references. Helpers are expanded one
//! level deep, not transitively; a helper's own callees are left to the model
//! to reason about from the names.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use crate::hosts::{clean_lines, DecompilerHost};
use crate::model::{
    CombinedPseudocode, FunctionReference, PseudocodeDocument, DEFAULT_REFERENCE_PREFIX,
};

/// Collects a primary function and the helpers it references into one
/// combined document.
pub struct Collector<'a> {
    host: &'a dyn DecompilerHost,
    reference: Regex,
    call_site: Regex,
}

impl<'a> Collector<'a> {
    /// Collector using the default `sub_` reference prefix.
    pub fn new(host: &'a dyn DecompilerHost) -> Self {
        Self::with_prefix(host, DEFAULT_REFERENCE_PREFIX)
    }

    /// Collector for hosts that use a different synthetic-name prefix
    /// (rizin emits `fcn.`, for example).
    pub fn with_prefix(host: &'a dyn DecompilerHost, prefix: &str) -> Self {
        let escaped = regex::escape(prefix);
        let reference = Regex::new(&format!("{escaped}[0-9A-Fa-f]+"))
            .expect("reference pattern must compile");
        let call_site = Regex::new(&format!(r"({escaped}[0-9A-Fa-f]+)\s*\("))
            .expect("call-site pattern must compile");
        Self { host, reference, call_site }
    }

    /// Build the combined document for `primary_text`.
    ///
    /// Empty input yields an empty document without scanning. A reference
    /// that fails to resolve at any step (unknown symbol, no function at the
    /// address, decompilation failure, all-blank body) is omitted; one bad
    /// helper never aborts the collection.
    pub fn collect(&self, primary_text: &str) -> CombinedPseudocode {
        if primary_text.is_empty() {
            return CombinedPseudocode::new(String::new());
        }

        let mut combined = CombinedPseudocode::new(primary_text);

        // BTreeSet keeps traversal (and thus output) order deterministic.
        let mut pending: BTreeSet<FunctionReference> = self
            .reference
            .find_iter(primary_text)
            .map(|m| FunctionReference::new(m.as_str()))
            .collect();

        let mut visited: HashSet<FunctionReference> = HashSet::new();

        // The first reference followed by `(` is taken to be the primary
        // function itself (its signature reads as a call expression). Its
        // body is already in the primary text, so it is never re-decompiled
        // as a helper.
        if let Some(caps) = self.call_site.captures(primary_text) {
            visited.insert(FunctionReference::new(&caps[1]));
        }

        while let Some(reference) = pending.pop_first() {
            if !visited.insert(reference.clone()) {
                continue;
            }
            match self.helper_document(&reference) {
                Some(body) => combined.push_helper(reference, body),
                None => log::debug!("omitting unresolved helper {reference}"),
            }
        }

        combined
    }

    /// String-in, string-out form of [`collect`](Self::collect).
    pub fn collect_text(&self, primary_text: &str) -> String {
        self.collect(primary_text).render()
    }

    /// Resolve one reference to a cleaned body, or `None` when any host step
    /// fails or the cleaned body is empty.
    fn helper_document(&self, reference: &FunctionReference) -> Option<PseudocodeDocument> {
        let address = self.host.address_of(reference.as_str())?;
        let function = self.host.function_at(address)?;
        let raw_lines = match self.host.decompile(&function) {
            Ok(lines) => lines,
            Err(e) => {
                log::debug!("decompilation failed for {reference}: {e}");
                return None;
            }
        };
        let document = PseudocodeDocument::from_cleaned_lines(clean_lines(self.host, &raw_lines));
        if document.is_empty() {
            return None;
        }
        Some(document)
    }
}
