//! Command-line interface for givetrack.
//!
//! This module provides the CLI structure for the `givetrack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddDonationArgs, AddVolunteerArgs, ClearArgs, ConfigCommand, DonationCommand, ListArgs,
    StatusCommand, VolunteerCommand,
};

/// givetrack - Keep a local log of donations and volunteer hours
///
/// Entries are stored on this machine and listed with running totals.
#[derive(Debug, Parser)]
#[command(name = "givetrack")]
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

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record, list and delete donations
    #[command(subcommand)]
    Donation(DonationCommand),

    /// Record, list and delete volunteer hours
    #[command(subcommand)]
    Volunteer(VolunteerCommand),

    /// Show store status
    Status(StatusCommand),

    /// View or check configuration
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use crate::view::OutputFormat;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "givetrack");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["givetrack", "-q", "status"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["givetrack", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["givetrack", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["givetrack", "-vv", "status"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_donation_add() {
        let cli = parse(&[
            "givetrack",
            "donation",
            "add",
            "--charity",
            "Charity A",
            "--amount",
            "100",
            "--date",
            "2023-10-01",
            "--comment",
            "Great job.",
        ]);
        let Command::Donation(DonationCommand::Add(args)) = cli.command else {
            panic!("expected donation add");
        };
        assert_eq!(args.charity, "Charity A");
        assert_eq!(args.amount, "100");
        assert_eq!(args.comment, "Great job.");
    }

    #[test]
    fn test_parse_donation_add_negative_amount_reaches_validation() {
        let cli = parse(&[
            "givetrack", "donation", "add", "--charity", "A", "--amount", "-50", "--date", "d",
        ]);
        let Command::Donation(DonationCommand::Add(args)) = cli.command else {
            panic!("expected donation add");
        };
        assert_eq!(args.amount, "-50");
    }

    #[test]
    fn test_parse_donation_add_missing_fields_default_empty() {
        let cli = parse(&["givetrack", "donation", "add"]);
        let Command::Donation(DonationCommand::Add(args)) = cli.command else {
            panic!("expected donation add");
        };
        assert!(args.charity.is_empty());
        assert!(args.amount.is_empty());
    }

    #[test]
    fn test_parse_donation_delete() {
        let cli = parse(&["givetrack", "donation", "delete", "2"]);
        assert!(matches!(
            cli.command,
            Command::Donation(DonationCommand::Delete { index: 2 })
        ));
    }

    #[test]
    fn test_parse_volunteer_add_with_rating() {
        let cli = parse(&[
            "givetrack",
            "volunteer",
            "add",
            "--charity",
            "Charity A",
            "--hours",
            "5",
            "--date",
            "2023-04-01",
            "--rating",
            "3",
        ]);
        let Command::Volunteer(VolunteerCommand::Add(args)) = cli.command else {
            panic!("expected volunteer add");
        };
        assert_eq!(args.rating, Some(3));
    }

    #[test]
    fn test_parse_volunteer_rating_out_of_range() {
        let result = Cli::try_parse_from([
            "givetrack", "volunteer", "add", "--rating", "6",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_volunteer_delete() {
        let cli = parse(&["givetrack", "volunteer", "delete", "1680307200000"]);
        assert!(matches!(
            cli.command,
            Command::Volunteer(VolunteerCommand::Delete { id: 1_680_307_200_000 })
        ));
    }

    #[test]
    fn test_parse_list_format() {
        let cli = parse(&["givetrack", "volunteer", "list", "--format", "json"]);
        let Command::Volunteer(VolunteerCommand::List(args)) = cli.command else {
            panic!("expected volunteer list");
        };
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["givetrack", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
