use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glyphpick::{init_logging, Config, Scenario};

/// glyphpick CLI arguments
///
/// Examples:
///   glyphpick replay session.json                      # Replay with default settings
///   glyphpick replay session.json --config pick.toml   # Replay with a config file
///   glyphpick default-config pick.toml                 # Write the default config
#[derive(Parser, Debug)]
#[clap(
    name = "glyphpick",
    version,
    about = "Glyph selection for music sheet editing",
    long_about = "Replays scripted pointer gestures over a sheet of glyphs and prints every selection event as one JSON line."
)]
struct CliArgs {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario file
    Replay {
        /// Scenario with glyphs and steps (JSON)
        scenario: PathBuf,

        #[clap(
            long = "config",
            short = 'c',
            help = "Config file (.json or .toml)"
        )]
        config: Option<PathBuf>,
    },
    /// Write the default configuration
    DefaultConfig {
        /// Destination (.json or .toml)
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    match args.command {
        Command::Replay { scenario, config } => {
            let config = match config {
                Some(path) => Config::load_from_file(&path)
                    .with_context(|| format!("Loading {}", path.display()))?,
                None => Config::new(),
            };
            init_logging(&config.logging)?;
            tracing::debug!(
                "glyphpick {} (built {})",
                glyphpick::VERSION,
                glyphpick::BUILD_DATE
            );

            let replay = Scenario::load(&scenario)?.replay(&config)?;
            for line in &replay.lines {
                println!("{}", serde_json::to_string(line)?);
            }
            if config.event_bus.enable_history {
                tracing::info!("{} events kept in bus history", replay.history_len);
            }
        }
        Command::DefaultConfig { path } => {
            Config::new().save_to_file(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
