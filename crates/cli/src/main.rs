mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use commands::catalog::cmd_catalog;
use commands::check::cmd_check;
use commands::eval::cmd_eval;
use commands::generate::cmd_generate;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Racket Road pill-to-code toolchain.
#[derive(Parser)]
#[command(name = "racket-road", version, about = "Racket Road pill-to-code toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the standard pill catalog
    Catalog,

    /// Generate Racket source from a pill layout file
    Generate {
        /// Path to a JSON file: {"lines": [["define", "x", "num-1"], ...]}
        /// of catalog ids
        file: PathBuf,
    },

    /// Run the local syntax validator over a source file
    Check {
        /// Path to the Racket source file
        file: PathBuf,
    },

    /// Validate a source file and evaluate it through the configured
    /// evaluator chain
    Eval {
        /// Path to the Racket source file
        file: PathBuf,
        /// LLM model to use when ANTHROPIC_API_KEY is set
        #[arg(long)]
        model: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog => {
            cmd_catalog(cli.output, cli.quiet);
        }
        Commands::Generate { file } => {
            cmd_generate(&file, cli.output, cli.quiet);
        }
        Commands::Check { file } => {
            cmd_check(&file, cli.output, cli.quiet);
        }
        Commands::Eval { file, model } => {
            cmd_eval(&file, model.as_deref(), cli.output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
