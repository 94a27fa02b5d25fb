//! Generates fictitious entities and prints them as JSON lines.
//!
//! This binary delegates to `example_entities::cli` for provider wiring and
//! generation, keeping the behaviour testable without spawning a process.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use example_entities::GeneratorSettings;
use example_entities::cli::{CliError, build_provider, generate, render};
use ortho_config::OrthoConfig;
use rand::Rng;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "generation failed");
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let settings =
        GeneratorSettings::load_from_iter(env::args_os()).map_err(|e| CliError::Settings {
            message: e.to_string(),
        })?;
    let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "using seed; set EXAMPLE_ENTITIES_SEED to reproduce");

    let provider = build_provider(&settings)?;
    let entities = generate(&provider, &settings, seed)?;

    let mut out = io::stdout().lock();
    for entity in &entities {
        let line = render(entity)?;
        if let Err(err) = writeln!(out, "{line}") {
            drop(err);
            break;
        }
    }
    Ok(())
}
