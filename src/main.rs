//! Mandalagen - mandala generation CLI.

mod adapters;
mod cassette;
mod cli;
mod codec;
mod config;
mod context;
mod error;
mod output;
mod pipeline;
mod ports;
mod prompt;

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::output::{resolve_output_path, save_png};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if e.to_string().contains("API key") {
            eprintln!("Please check that your API key is valid and has sufficient credits");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), error::MandalaError> {
    // Reject blank input before touching config or the network.
    if cli.word.trim().is_empty() {
        return Err(error::MandalaError::Validation("inspiration word must not be empty".into()));
    }

    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(error::MandalaError::Config)?;

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("MANDALA_REPLAY").ok();
    let is_recording = std::env::var("MANDALA_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        if cli.verbose {
            eprintln!("Replaying from: {cassette_path}");
        }
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        if cli.verbose {
            eprintln!("Recording mode enabled");
        }
        let (ctx, session) = ServiceContext::recording(&config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config)?, None)
    };

    if cli.verbose {
        eprintln!("Generating mandala inspired by '{}'...", cli.word.trim());
    }

    // Generate
    let mandala = pipeline::generate_mandala(&ctx, &cli.word).await?;

    // Save as PNG
    let output_path = resolve_output_path(cli.output.as_deref(), &mandala.source_word);
    save_png(&mandala.image, &output_path)?;
    eprintln!("Saved: {}", output_path.display());

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    Ok(())
}
