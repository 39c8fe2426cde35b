//! Host decompiler services.
//!
//! The collector treats the host as four black boxes: symbol-name-to-address
//! lookup, address-to-function lookup, function-to-decompiled-text, and raw
//! line cleaning (tag stripping). Any of them may fail or return "not found";
//! callers degrade gracefully instead of aborting.

pub mod json;
#[cfg(feature = "rizin-host")]
pub mod rizin;

pub use json::JsonDumpHost;
#[cfg(feature = "rizin-host")]
pub use rizin::RizinHost;

use std::collections::HashMap;

use thiserror::Error;

/// Opaque handle for a function known to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHandle {
    pub address: u64,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Host tool error: {0}")]
    Tool(String),
    #[error("Decompilation failed for {0:#x}")]
    Decompile(u64),
}

/// Trait implemented by decompiler host adapters (JSON dump, rizin, ...).
pub trait DecompilerHost: Send + Sync {
    /// Resolve a symbol name to its address, or `None` when unknown.
    fn address_of(&self, symbol: &str) -> Option<u64>;

    /// Fetch the function at `address`, or `None` when no function starts there.
    fn function_at(&self, address: u64) -> Option<FunctionHandle>;

    /// Decompile a function into raw output lines, formatting tags included.
    fn decompile(&self, function: &FunctionHandle) -> Result<Vec<String>, HostError>;

    /// Strip host formatting tags from one raw line. The default handles the
    /// IDA-style scheme: 0x01/0x02 introduce an on/off tag whose code byte
    /// follows, 0x03 escapes the next character.
    fn strip_tags(&self, line: &str) -> String {
        strip_color_tags(line)
    }

    fn name(&self) -> &'static str;
}

/// Remove IDA-style color tags from a line of decompiled text.
pub fn strip_color_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\u{1}' | '\u{2}' => {
                // Tag marker; the code character that follows is not text.
                chars.next();
            }
            '\u{3}' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Strip tags from every raw line via the host, drop blanks, and return the
/// surviving cleaned lines.
pub fn clean_lines(host: &dyn DecompilerHost, raw_lines: &[String]) -> Vec<String> {
    raw_lines
        .iter()
        .map(|line| host.strip_tags(line))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Registry for host adapters; callers select by name.
#[derive(Default)]
pub struct HostRegistry {
    hosts: HashMap<String, Box<dyn DecompilerHost>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self { hosts: HashMap::new() }
    }

    pub fn register<H: DecompilerHost + 'static>(&mut self, host: H) -> &mut Self {
        self.hosts.insert(host.name().to_string(), Box::new(host));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn DecompilerHost> {
        self.hosts.get(name).map(|h| &**h)
    }

    /// Return a sorted list of registered host names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.hosts.keys().cloned().collect();
        keys.sort();
        keys
    }
}
