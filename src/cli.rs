//! CLI argument parsing with clap.

use clap::Parser;

/// Generate a black and white mandala coloring page from one word.
#[derive(Parser, Debug)]
#[command(name = "mandalagen", version, about)]
pub struct Cli {
    /// Inspiration word that themes the mandala (e.g. peace, love, nature).
    pub word: String,

    /// Output file path (derived from the word if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}
