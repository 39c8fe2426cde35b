use anyhow::{Context, Result};
use gloss_core::config::{SUPPORTED_MODELS, TARGET_LANGUAGES};

/// List the models the dispatcher can route to.
pub fn models_command(json: bool) -> Result<()> {
    print_list(SUPPORTED_MODELS, json)
}

/// List the target languages offered for translation.
pub fn languages_command(json: bool) -> Result<()> {
    print_list(TARGET_LANGUAGES, json)
}

fn print_list(items: &[&str], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items).context("Failed to serialize list")?);
    } else {
        for item in items {
            println!("{item}");
        }
    }
    Ok(())
}
