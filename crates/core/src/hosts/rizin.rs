use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::hosts::{DecompilerHost, FunctionHandle, HostError};

/// Rizin-backed host that shells out to rizin/rz for symbol lookup and
/// decompilation.
///
/// The symbol table is loaded once at open time via `aa;aflj`; decompilation
/// runs `pdc` at the function address. Synthetic function names carry the
/// `fcn.` prefix in rizin output, so collectors built over this host should
/// use that reference prefix.
#[derive(Debug)]
pub struct RizinHost {
    binary: PathBuf,
    rizin_path: PathBuf,
    by_name: HashMap<String, u64>,
    by_address: HashMap<u64, String>,
}

#[derive(Debug, Deserialize)]
struct RizinFunction {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    offset: Option<u64>,
}

impl RizinHost {
    /// Open a binary with rizin and load its symbol table.
    ///
    /// `rizin_path` overrides the executable; otherwise `RIZIN_BIN` or plain
    /// `rizin` on PATH is used. Tests can feed synthetic output via
    /// `GLOSS_RIZIN_FAKE_FUNCTIONS` / `GLOSS_RIZIN_FAKE_DECOMP` to avoid
    /// needing rizin installed.
    pub fn open(binary: impl AsRef<Path>, rizin_path: Option<PathBuf>) -> Result<Self, HostError> {
        let binary = binary.as_ref().to_path_buf();
        if !binary.is_file() && std::env::var_os("GLOSS_RIZIN_FAKE_FUNCTIONS").is_none() {
            return Err(HostError::Tool(format!("binary not found at {}", binary.display())));
        }
        let rizin_path = rizin_path.unwrap_or_else(resolve_rizin_path);

        let json = if let Some(fake) = std::env::var_os("GLOSS_RIZIN_FAKE_FUNCTIONS") {
            fs::read_to_string(fake).map_err(|e| {
                HostError::Tool(format!("failed to read GLOSS_RIZIN_FAKE_FUNCTIONS: {e}"))
            })?
        } else {
            run_rizin(&rizin_path, &binary, "aa;aflj")?
        };
        let (by_name, by_address) = parse_functions(&json)?;

        Ok(Self { binary, rizin_path, by_name, by_address })
    }
}

impl DecompilerHost for RizinHost {
    fn address_of(&self, symbol: &str) -> Option<u64> {
        self.by_name.get(symbol).copied()
    }

    fn function_at(&self, address: u64) -> Option<FunctionHandle> {
        self.by_address
            .get(&address)
            .map(|name| FunctionHandle { address, name: name.clone() })
    }

    fn decompile(&self, function: &FunctionHandle) -> Result<Vec<String>, HostError> {
        let text = if let Some(fake) = std::env::var_os("GLOSS_RIZIN_FAKE_DECOMP") {
            fs::read_to_string(fake).map_err(|e| {
                HostError::Tool(format!("failed to read GLOSS_RIZIN_FAKE_DECOMP: {e}"))
            })?
        } else {
            let command = format!("aa;s {:#x};pdc", function.address);
            run_rizin(&self.rizin_path, &self.binary, &command)?
        };
        if text.trim().is_empty() {
            return Err(HostError::Decompile(function.address));
        }
        Ok(text.lines().map(str::to_string).collect())
    }

    fn name(&self) -> &'static str {
        "rizin"
    }
}

fn resolve_rizin_path() -> PathBuf {
    std::env::var_os("RIZIN_BIN").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("rizin"))
}

fn run_rizin(rizin_bin: &Path, binary: &Path, command: &str) -> Result<String, HostError> {
    let output = Command::new(rizin_bin)
        .args(["-2", "-q0", "-c", command])
        .arg(binary)
        .output()
        .map_err(|e| HostError::Tool(format!("failed to spawn rizin: {e}")))?;
    if !output.status.success() {
        return Err(HostError::Tool(format!("rizin exited with {}", output.status)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn parse_functions(body: &str) -> Result<(HashMap<String, u64>, HashMap<u64, String>), HostError> {
    // rizin aflj returns a JSON array; tolerate entries without name/offset.
    let funcs: Vec<RizinFunction> = serde_json::from_str(body)
        .map_err(|e| HostError::Tool(format!("failed to parse rizin JSON: {e}")))?;
    let mut by_name = HashMap::new();
    let mut by_address = HashMap::new();
    for f in funcs {
        if let (Some(name), Some(offset)) = (f.name, f.offset) {
            by_name.insert(name.clone(), offset);
            by_address.insert(offset, name);
        }
    }
    Ok((by_name, by_address))
}
