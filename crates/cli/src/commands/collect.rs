use anyhow::{Context, Result};
use gloss_core::collector::Collector;
use gloss_core::hosts::JsonDumpHost;

use crate::read_input;

/// Build the combined document (primary plus helpers) and print it.
///
/// The JSON dump host serves helper decompilations; see `JsonDumpHost` for
/// the expected dump shape.
pub fn collect_command(dump: &str, input: &str, prefix: &str) -> Result<()> {
    let host = JsonDumpHost::from_path(dump)
        .with_context(|| format!("Failed to load function dump {dump}"))?;
    let primary = read_input(input)?;

    let collector = Collector::with_prefix(&host, prefix);
    println!("{}", collector.collect_text(&primary));
    Ok(())
}
