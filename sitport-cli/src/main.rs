//! sitport CLI - Command-line interface
//!
//! Pulls the configured SITPORT endpoints and writes them as one JSON
//! snapshot. Running without a subcommand performs a fetch.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::fetch::FetchArgs;

#[derive(Parser)]
#[command(name = "sitport")]
#[command(version = sitport::VERSION)]
#[command(about = "Snapshot the SITPORT port-status API to a JSON file", long_about = None)]
struct Cli {
    /// Path to config.ini (default: ~/.sitport/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every endpoint and write the snapshot (default)
    Fetch {
        /// Snapshot output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Upstream base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Attempts per endpoint before giving up
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_attempts: Option<u32>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the configured endpoints in fetch order
    Endpoints,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command.unwrap_or(Commands::Fetch {
        output: None,
        base_url: None,
        max_attempts: None,
        debug: false,
    }) {
        Commands::Fetch {
            output,
            base_url,
            max_attempts,
            debug,
        } => commands::fetch::run(FetchArgs {
            config,
            output,
            base_url,
            max_attempts,
            debug,
        }),
        Commands::Init { force } => commands::init::run(config.as_deref(), force),
        Commands::Endpoints => commands::endpoints::run(config.as_deref()),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_fetch() {
        let cli = Cli::try_parse_from(["sitport"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_fetch_overrides_parse() {
        let cli = Cli::try_parse_from([
            "sitport",
            "fetch",
            "--output",
            "/tmp/out.json",
            "--max-attempts",
            "3",
            "--config",
            "/tmp/c.ini",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.ini")));
        match cli.command {
            Some(Commands::Fetch {
                output,
                max_attempts,
                debug,
                ..
            }) => {
                assert_eq!(output, Some(PathBuf::from("/tmp/out.json")));
                assert_eq!(max_attempts, Some(3));
                assert!(!debug);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(Cli::try_parse_from(["sitport", "fetch", "--max-attempts", "0"]).is_err());
    }
}
