//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate per-language client SDKs from one canonical API schema.
#[derive(Parser)]
#[command(name = "manifold", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate SDK sources for the selected languages
    Generate {
        /// Schema files or directories, merged in order (a directory
        /// contributes its *.json files in filename order)
        #[arg(short, long, required = true, num_args = 1..)]
        schema: Vec<PathBuf>,

        /// Output root directory; one subdirectory per language
        #[arg(short, long)]
        out: PathBuf,

        /// Target languages: "all" or a comma-separated list of ids
        #[arg(short, long, default_value = "all")]
        lang: String,

        /// Override the base URL baked into generated clients
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Load and validate a schema without generating anything
    Check {
        /// Schema files or directories, merged in order
        #[arg(short, long, required = true, num_args = 1..)]
        schema: Vec<PathBuf>,
    },
    /// List the configured target languages
    Languages,
}
