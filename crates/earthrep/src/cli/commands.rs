//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Report command arguments.
///
/// Values are taken as typed; they go through the same checks as the form.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Latitude of the map click
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the map click
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Felt strength
    #[arg(short, long, allow_hyphen_values = true)]
    pub strength: String,

    /// Duration in seconds
    #[arg(short, long, allow_hyphen_values = true)]
    pub duration: String,

    /// How many minutes ago it happened
    #[arg(short = 'm', long, allow_hyphen_values = true)]
    pub minutes_ago: String,

    /// Material damage, if any
    #[arg(long, default_value = "")]
    pub damage: String,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Locate command arguments.
#[derive(Debug, Args)]
pub struct LocateCommand {
    /// Id of the report to focus the map on
    pub id: String,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to config file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listing reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per report
    #[default]
    Plain,
    /// The stored JSON layout
    Json,
    /// List entries as rendered in the page
    Html,
}
