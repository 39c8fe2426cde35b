use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::hosts::{DecompilerHost, FunctionHandle, HostError};

/// Host adapter that serves functions from a JSON dump file.
///
/// The dump is produced offline (e.g. by a headless decompiler export) and
/// maps symbol names to an address and the raw decompiled lines. This is the
/// host used by tests and by the CLI when no live decompiler is available.
///
/// Expected shape:
/// ```json
/// { "functions": { "sub_1000": { "address": 4096, "lines": ["..."] } } }
/// ```
#[derive(Debug)]
pub struct JsonDumpHost {
    by_name: HashMap<String, DumpFunction>,
    by_address: HashMap<u64, String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DumpFunction {
    address: u64,
    #[serde(default)]
    lines: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Dump {
    #[serde(default)]
    functions: HashMap<String, DumpFunction>,
}

impl JsonDumpHost {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let body = fs::read_to_string(path.as_ref()).map_err(|e| {
            HostError::Tool(format!("failed to read dump {}: {e}", path.as_ref().display()))
        })?;
        Self::from_json_str(&body)
    }

    pub fn from_json_str(body: &str) -> Result<Self, HostError> {
        let dump: Dump = serde_json::from_str(body)
            .map_err(|e| HostError::Tool(format!("failed to parse dump JSON: {e}")))?;
        let by_address =
            dump.functions.iter().map(|(name, f)| (f.address, name.clone())).collect();
        Ok(Self { by_name: dump.functions, by_address })
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl DecompilerHost for JsonDumpHost {
    fn address_of(&self, symbol: &str) -> Option<u64> {
        self.by_name.get(symbol).map(|f| f.address)
    }

    fn function_at(&self, address: u64) -> Option<FunctionHandle> {
        self.by_address
            .get(&address)
            .map(|name| FunctionHandle { address, name: name.clone() })
    }

    fn decompile(&self, function: &FunctionHandle) -> Result<Vec<String>, HostError> {
        self.by_name
            .get(&function.name)
            .map(|f| f.lines.clone())
            .ok_or(HostError::Decompile(function.address))
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
