use anyhow::Result;
use clap::{Parser, Subcommand};
use gloss_cli::commands;

/// AI-assisted translation of decompiled pseudocode.
///
/// This CLI is a thin wrapper around `gloss-core`. All substantive logic
/// lives in the library so it can be tested thoroughly and reused from other
/// frontends.
#[derive(Parser, Debug)]
#[command(
    name = "gloss",
    version,
    about = "Translate decompiled pseudocode into modern source languages",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize translator configuration at the given root.
    ///
    /// Writes `.gloss/config.json` with the selected model and target
    /// language (defaults when omitted).
    Init {
        /// Config root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Model to select. Must be one of the supported models.
        #[arg(long)]
        model: Option<String>,

        /// Target language to select. Must be one of the supported languages.
        #[arg(long)]
        language: Option<String>,
    },

    /// Show the stored configuration (credential masked).
    ConfigInfo {
        /// Config root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Update stored configuration fields.
    SetConfig {
        /// Config root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Model to select. Must be one of the supported models.
        #[arg(long)]
        model: Option<String>,

        /// Target language to select. Must be one of the supported languages.
        #[arg(long)]
        language: Option<String>,

        /// Credential for the translation service.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// List the supported models.
    Models {
        /// Emit JSON instead of one name per line.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the supported target languages.
    Languages {
        /// Emit JSON instead of one name per line.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Build the combined document for a primary function and print it.
    ///
    /// Helper functions referenced in the primary text are decompiled from
    /// the JSON function dump and appended behind `// Function:` markers.
    Collect {
        /// Path to the JSON function dump.
        #[arg(long)]
        dump: String,

        /// Path to the primary function's pseudocode, or `-` for stdin.
        #[arg(long)]
        input: String,

        /// Reference prefix used by the host's synthetic function names.
        #[arg(long, default_value = "sub_")]
        prefix: String,
    },

    /// Collect the combined document and translate it via the cloud model.
    Translate {
        /// Config root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Path to the primary function's pseudocode, or `-` for stdin.
        #[arg(long)]
        input: String,

        /// Optional JSON function dump for helper expansion.
        #[arg(long)]
        dump: Option<String>,

        /// Reference prefix used by the host's synthetic function names.
        #[arg(long, default_value = "sub_")]
        prefix: String,

        /// Model override; defaults to the stored config.
        #[arg(long)]
        model: Option<String>,

        /// Target language override; defaults to the stored config.
        #[arg(long)]
        language: Option<String>,

        /// Credential override; falls back to GLOSS_API_KEY, then the config.
        #[arg(long)]
        api_key: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Init { root, model, language } => commands::init_command(&root, model, language),
        Command::ConfigInfo { root, json } => commands::config_info_command(&root, json),
        Command::SetConfig { root, model, language, api_key } => {
            commands::set_config_command(&root, model, language, api_key)
        }
        Command::Models { json } => commands::models_command(json),
        Command::Languages { json } => commands::languages_command(json),
        Command::Collect { dump, input, prefix } => {
            commands::collect_command(&dump, &input, &prefix)
        }
        Command::Translate { root, input, dump, prefix, model, language, api_key } => {
            commands::translate_command(commands::TranslateArgs {
                root,
                input,
                dump,
                prefix,
                model,
                language,
                api_key,
            })
        }
    }
}
