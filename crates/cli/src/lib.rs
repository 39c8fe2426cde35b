use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gloss_core::config::{ConfigLayout, TranslatorConfig};

pub mod commands;

/// Canonicalize the root path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    if path == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        // Try to canonicalize; if it fails (e.g., path does not yet exist),
        // join it with the current dir to get an absolute path.
        match path.canonicalize() {
            Ok(p) => Ok(p),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(path))
            }
        }
    }
}

/// Load the translator config from `<root>/.gloss/config.json`.
pub fn load_config(root: &Path) -> Result<TranslatorConfig> {
    let layout = ConfigLayout::new(root);
    let body = fs::read_to_string(&layout.config_path).with_context(|| {
        format!(
            "No translator config at {} (run `gloss init` first)",
            layout.config_path.display()
        )
    })?;
    serde_json::from_str(&body)
        .with_context(|| format!("Failed to parse config {}", layout.config_path.display()))
}

/// Write the translator config to `<root>/.gloss/config.json`, creating the
/// metadata directory if needed.
pub fn save_config(root: &Path, config: &TranslatorConfig) -> Result<()> {
    let layout = ConfigLayout::new(root);
    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    let body = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&layout.config_path, body)
        .with_context(|| format!("Failed to write config {}", layout.config_path.display()))
}

/// Read pseudocode from a file path, or from stdin when the path is `-`.
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read pseudocode from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read pseudocode from {input}"))
    }
}
