use anyhow::{bail, Context, Result};
use gloss_core::config::{ConfigLayout, TranslatorConfig, SUPPORTED_MODELS, TARGET_LANGUAGES};
use serde::Serialize;

use crate::{canonicalize_or_current, load_config, save_config};

#[derive(Serialize)]
struct ConfigSnapshotView {
    root: String,
    config_file: String,
    model: String,
    target_language: String,
    /// The credential itself is never echoed back.
    api_key_set: bool,
}

/// Initialize translator configuration at `root`.
pub fn init_command(root: &str, model: Option<String>, language: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let mut config = TranslatorConfig::default();
    if let Some(model) = model {
        config.model = validated_model(model)?;
    }
    if let Some(language) = language {
        config.target_language = validated_language(language)?;
    }
    save_config(&root_path, &config)?;

    let layout = ConfigLayout::new(&root_path);
    println!("Initialized translator config at {}", layout.config_path.display());
    Ok(())
}

/// Show the current configuration (credential masked).
pub fn config_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let config = load_config(&root_path)?;
    let layout = ConfigLayout::new(&root_path);

    let view = ConfigSnapshotView {
        root: root_path.display().to_string(),
        config_file: layout.config_path.display().to_string(),
        model: config.model,
        target_language: config.target_language,
        api_key_set: !config.api_key.is_empty(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to serialize config info")?
        );
    } else {
        println!("Config file:     {}", view.config_file);
        println!("Model:           {}", view.model);
        println!("Target language: {}", view.target_language);
        println!("API key set:     {}", view.api_key_set);
    }
    Ok(())
}

/// Update selected fields of the stored configuration.
pub fn set_config_command(
    root: &str,
    model: Option<String>,
    language: Option<String>,
    api_key: Option<String>,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let mut config = load_config(&root_path)?;

    if let Some(model) = model {
        config.model = validated_model(model)?;
    }
    if let Some(language) = language {
        config.target_language = validated_language(language)?;
    }
    if let Some(api_key) = api_key {
        config.api_key = api_key;
    }

    save_config(&root_path, &config)?;
    println!("Updated translator config");
    Ok(())
}

fn validated_model(model: String) -> Result<String> {
    if SUPPORTED_MODELS.iter().any(|m| m.eq_ignore_ascii_case(&model)) {
        Ok(model)
    } else {
        bail!("Unsupported model '{model}'. Supported models: {}", SUPPORTED_MODELS.join(", "));
    }
}

fn validated_language(language: String) -> Result<String> {
    if TARGET_LANGUAGES.iter().any(|l| l.eq_ignore_ascii_case(&language)) {
        Ok(language)
    } else {
        bail!(
            "Unsupported target language '{language}'. Supported languages: {}",
            TARGET_LANGUAGES.join(", ")
        );
    }
}
