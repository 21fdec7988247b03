//! Command-line interface for earthrep.
//!
//! This module provides the CLI structure for the `earthrep` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::record::Coordinates;

pub use commands::{
    ConfigCommand, ListCommand, LocateCommand, OutputFormat, ReportCommand, ResetCommand,
    StatusCommand,
};

/// earthrep - Report earthquakes you felt
///
/// Click a spot on the map, describe what you felt, and keep the reports in
/// local storage.
#[derive(Debug, Parser)]
#[command(name = "earthrep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Current position as LAT,LNG (overrides `map.home`)
    #[arg(
        short,
        long,
        global = true,
        value_name = "LAT,LNG",
        allow_hyphen_values = true,
        value_parser = parse_position
    )]
    pub position: Option<Coordinates>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report an earthquake at a map location
    Report(ReportCommand),

    /// List stored reports, newest first
    List(ListCommand),

    /// Focus the map on a stored report
    Locate(LocateCommand),

    /// Delete all stored reports
    Reset(ResetCommand),

    /// Show storage status
    Status(StatusCommand),

    /// Show what earthrep is for
    About,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

fn parse_position(value: &str) -> Result<Coordinates, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got `{value}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude `{lat}`: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude `{lng}`: {e}"))?;
    Coordinates::try_new(lat, lng).ok_or_else(|| format!("position must be finite, got `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            position: None,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "earthrep");
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(
            cli_with(0, true).verbosity(),
            crate::logging::Verbosity::Quiet
        );
    }

    #[test]
    fn test_verbosity_normal() {
        assert_eq!(
            cli_with(0, false).verbosity(),
            crate::logging::Verbosity::Normal
        );
    }

    #[test]
    fn test_verbosity_verbose() {
        assert_eq!(
            cli_with(1, false).verbosity(),
            crate::logging::Verbosity::Verbose
        );
    }

    #[test]
    fn test_verbosity_trace() {
        assert_eq!(
            cli_with(2, false).verbosity(),
            crate::logging::Verbosity::Trace
        );
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report() {
        let args = vec![
            "earthrep",
            "report",
            "--lat",
            "45.0",
            "--lng",
            "-15.5",
            "--strength",
            "4.5",
            "--duration",
            "30",
            "--minutes-ago",
            "10",
            "--damage",
            "minor cracks",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Report(report) = cli.command else {
            panic!("expected report command");
        };
        assert!((report.lat - 45.0).abs() < f64::EPSILON);
        assert!((report.lng + 15.5).abs() < f64::EPSILON);
        assert_eq!(report.strength, "4.5");
        assert_eq!(report.minutes_ago, "10");
        assert_eq!(report.damage, "minor cracks");
    }

    #[test]
    fn test_parse_report_keeps_raw_values() {
        let args = vec![
            "earthrep", "report", "--lat", "1", "--lng", "2", "-s", "-1", "-d", "abc", "-m",
            "0x10",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Report(report) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(report.strength, "-1");
        assert_eq!(report.duration, "abc");
        assert_eq!(report.minutes_ago, "0x10");
        assert!(report.damage.is_empty());
    }

    #[test]
    fn test_parse_list_format() {
        let cli = Cli::try_parse_from(["earthrep", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List(ListCommand {
                format: OutputFormat::Plain
            })
        ));

        let cli = Cli::try_parse_from(["earthrep", "list", "--format", "html"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List(ListCommand {
                format: OutputFormat::Html
            })
        ));
    }

    #[test]
    fn test_parse_locate() {
        let cli = Cli::try_parse_from(["earthrep", "locate", "0000123456"]).unwrap();
        let Command::Locate(locate) = cli.command else {
            panic!("expected locate command");
        };
        assert_eq!(locate.id, "0000123456");
    }

    #[test]
    fn test_parse_reset() {
        let cli = Cli::try_parse_from(["earthrep", "reset", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Reset(ResetCommand { yes: true })));
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["earthrep", "status"]).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_about() {
        let cli = Cli::try_parse_from(["earthrep", "about"]).unwrap();
        assert!(matches!(cli.command, Command::About));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["earthrep", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["earthrep", "-v", "status"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["earthrep", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_position() {
        let cli = Cli::try_parse_from(["earthrep", "--position", "45.8,-15.9", "locate", "1"])
            .unwrap();
        assert_eq!(cli.position, Some(Coordinates::new(45.8, -15.9)));
    }

    #[test]
    fn test_parse_position_errors() {
        assert!(parse_position("45.8").is_err());
        assert!(parse_position("north,15").is_err());
        assert!(parse_position("inf,15").is_err());
        assert_eq!(parse_position(" 1 , 2 "), Ok(Coordinates::new(1.0, 2.0)));
    }
}
