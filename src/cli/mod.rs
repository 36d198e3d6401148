//! CLI module - Command-line interface for kakeibo

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kakeibo - household account books on the web
#[derive(Parser)]
#[command(name = "kakeibo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default)
    #[command(alias = "s")]
    Serve,

    /// Write a default config.toml if none exists
    InitConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["kakeibo"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["kakeibo", "serve", "--config", "/tmp/k.toml"]);
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/k.toml")));

        let cli = Cli::parse_from(["kakeibo", "init-config"]);
        assert_eq!(cli.command, Some(Commands::InitConfig));
    }
}
