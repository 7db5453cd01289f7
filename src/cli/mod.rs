//! CLI module - command-line interface for Cityscope.

pub mod commands;

use clap::{Parser, Subcommand};

/// Cityscope - location, weather and events lookup service
#[derive(Parser)]
#[command(name = "cityscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Write a default cityscope.toml in the working directory
    Init,

    /// Resolve a location once and print its weather and events as JSON
    #[command(alias = "l")]
    Lookup {
        /// Free-text location, e.g. "Seattle"
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Apply pending database migrations and exit
    Migrate,
}

impl Cli {
    /// The requested command, `serve` when none was given.
    #[must_use]
    pub fn command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
