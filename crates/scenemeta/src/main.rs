// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scenemeta - inspect scene manifests through the manifest metadata bus.
//!
//! This is the binary entry point.

mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scenemeta_bus::{BusOptions, ManifestMetaInfoBus};
use scenemeta_config::ScenemetaConfig;
use scenemeta_core::SceneMetaError;

/// Scenemeta - inspect scene manifests through the manifest metadata bus.
#[derive(Parser, Debug)]
#[command(name = "scenemeta", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show categories, icons and available modifiers for a scene.
    Inspect {
        /// Scene description file (TOML).
        scene: PathBuf,
        /// Only describe the entry with this name.
        #[arg(long)]
        object: Option<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration.
    Config,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => scenemeta_config::load_and_validate_path(path),
        None => scenemeta_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            scenemeta_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.normalized_level());

    let result = match cli.command {
        Some(Commands::Inspect {
            scene,
            object,
            json,
        }) => {
            let bus = build_bus(&config);
            inspect::run_inspect(&bus, &scene, object.as_deref(), json)
        }
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("scenemeta: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("scenemeta: {e}");
        std::process::exit(1);
    }
}

/// Builds the bus from the `[bus]` configuration section.
fn build_bus(config: &ScenemetaConfig) -> ManifestMetaInfoBus {
    ManifestMetaInfoBus::with_options(BusOptions::from(&config.bus))
}

fn print_config(config: &ScenemetaConfig) -> Result<(), SceneMetaError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| SceneMetaError::Config(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Initialize the tracing subscriber with an env filter.
///
/// `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Filter directives for the workspace crates at `log_level`, `warn` elsewhere.
fn default_directives(log_level: &str) -> String {
    format!("scenemeta={log_level},scenemeta_bus={log_level},scenemeta_behaviors={log_level},warn")
}
