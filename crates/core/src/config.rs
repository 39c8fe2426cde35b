//! Configuration shared by all surfaces: selected model, target language,
//! and credential. Read-only from the collector/dispatcher side; fetched as
//! a snapshot at dispatch time.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Models offered to the user. Routing in the dispatcher must recognize
/// every entry here.
pub const SUPPORTED_MODELS: &[&str] = &["DeepSeek-V3"];

/// Target languages offered to the user.
pub const TARGET_LANGUAGES: &[&str] = &["C++", "Swift", "Go", "Rust", "Python", "C#"];

/// Serializable translator configuration.
///
/// This lives (for now) at `.gloss/config.json` under a chosen root; the CLI
/// or other frontends are responsible for the actual file IO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Selected model identifier.
    pub model: String,
    /// Selected target language.
    pub target_language: String,
    /// Credential for the translation service. Empty means "not configured";
    /// dispatch is refused before any network call in that case.
    #[serde(default)]
    pub api_key: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model: SUPPORTED_MODELS[0].to_string(),
            target_language: TARGET_LANGUAGES[0].to_string(),
            api_key: String::new(),
        }
    }
}

/// Source of the configuration snapshot a session reads at dispatch time.
///
/// Sessions hold this weakly: when the owning surface goes away the session
/// reports a lifecycle error instead of dispatching.
pub trait ConfigSource: Send + Sync {
    fn snapshot(&self) -> TranslatorConfig;
}

impl ConfigSource for Mutex<TranslatorConfig> {
    fn snapshot(&self) -> TranslatorConfig {
        match self.lock() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Logical layout of translator state on disk, derived from a root path.
///
/// This does *not* perform any IO itself; frontends create directories and
/// files based on it.
#[derive(Debug, Clone)]
pub struct ConfigLayout {
    /// Root directory the configuration belongs to.
    pub root: PathBuf,
    /// Directory for internal metadata (.gloss).
    pub meta_dir: PathBuf,
    /// Path to the config file (JSON).
    pub config_path: PathBuf,
}

impl ConfigLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".gloss");
        let config_path = meta_dir.join("config.json");
        Self { root, meta_dir, config_path }
    }
}
