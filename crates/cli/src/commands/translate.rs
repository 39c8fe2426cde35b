use anyhow::{bail, Context, Result};
use gloss_core::collector::Collector;
use gloss_core::config::{ConfigLayout, TranslatorConfig};
use gloss_core::dispatch::Dispatcher;
use gloss_core::hosts::JsonDumpHost;
use gloss_core::model::TranslationRequest;

use crate::{canonicalize_or_current, load_config, read_input};

pub struct TranslateArgs {
    pub root: String,
    pub input: String,
    /// Optional function dump for helper expansion; without it only the
    /// primary text is sent.
    pub dump: Option<String>,
    pub prefix: String,
    pub model: Option<String>,
    pub language: Option<String>,
    pub api_key: Option<String>,
}

/// Collect the combined document and dispatch one translation request.
///
/// Model, language, and credential come from the flags, falling back to the
/// stored config; the credential additionally falls back to `GLOSS_API_KEY`.
pub fn translate_command(args: TranslateArgs) -> Result<()> {
    let root_path = canonicalize_or_current(&args.root)?;
    // A missing config file is fine when all values come from flags/env,
    // but a corrupt one is still an error.
    let config = if ConfigLayout::new(&root_path).config_path.exists() {
        load_config(&root_path)?
    } else {
        TranslatorConfig::default()
    };

    let primary = read_input(&args.input)?;
    let pseudocode = match &args.dump {
        Some(dump) => {
            let host = JsonDumpHost::from_path(dump)
                .with_context(|| format!("Failed to load function dump {dump}"))?;
            Collector::with_prefix(&host, &args.prefix).collect_text(&primary)
        }
        None => primary,
    };

    let api_key = args
        .api_key
        .or_else(|| std::env::var("GLOSS_API_KEY").ok().filter(|k| !k.is_empty()))
        .unwrap_or(config.api_key);
    if api_key.is_empty() {
        bail!("API key is required (pass --api-key, set GLOSS_API_KEY, or run `gloss set-config`)");
    }

    let request = TranslationRequest {
        model: args.model.unwrap_or(config.model),
        pseudocode,
        target_language: args.language.unwrap_or(config.target_language),
        api_key,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;
    let translated = runtime.block_on(Dispatcher::new().translate(&request))?;
    println!("{translated}");
    Ok(())
}
