//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::donation::DonationForm;
use crate::view::OutputFormat;
use crate::volunteer::{VolunteerForm, MAX_RATING};

/// Donation commands.
#[derive(Debug, Subcommand)]
pub enum DonationCommand {
    /// Record a donation
    Add(AddDonationArgs),

    /// Show recorded donations and their total
    List(ListArgs),

    /// Delete the donation at a position (as shown by `list`)
    Delete {
        /// Zero-based position in the list
        index: usize,
    },

    /// Delete all donations
    Clear(ClearArgs),
}

/// Volunteer log commands.
#[derive(Debug, Subcommand)]
pub enum VolunteerCommand {
    /// Record volunteered hours
    Add(AddVolunteerArgs),

    /// Show recorded volunteer logs and total hours
    List(ListArgs),

    /// Delete the volunteer log with an id (as shown by `list`)
    Delete {
        /// Log id
        id: i64,
    },

    /// Delete all volunteer logs
    Clear(ClearArgs),
}

/// Donation form fields.
///
/// Every field is free text so that validation, not the argument parser,
/// decides what is acceptable.
#[derive(Debug, Args)]
pub struct AddDonationArgs {
    /// Charity name
    #[arg(long, default_value = "")]
    pub charity: String,

    /// Donation amount
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub amount: String,

    /// Donation date (e.g. 2023-10-01)
    #[arg(long, default_value = "")]
    pub date: String,

    /// Optional comment
    #[arg(long, default_value = "")]
    pub comment: String,
}

impl From<AddDonationArgs> for DonationForm {
    fn from(args: AddDonationArgs) -> Self {
        Self {
            charity_name: args.charity,
            donation_amount: args.amount,
            donation_date: args.date,
            donor_comment: args.comment,
        }
    }
}

/// Volunteer form fields.
#[derive(Debug, Args)]
pub struct AddVolunteerArgs {
    /// Charity name
    #[arg(long, default_value = "")]
    pub charity: String,

    /// Hours volunteered
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub hours: String,

    /// Date volunteered (e.g. 2023-04-01)
    #[arg(long, default_value = "")]
    pub date: String,

    /// Experience rating, 1 to 5 stars (unset if omitted)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_RATING)))]
    pub rating: Option<u8>,
}

impl AddVolunteerArgs {
    /// Split into the form fields and the selected star index.
    #[must_use]
    pub fn into_form(self) -> (VolunteerForm, Option<usize>) {
        let star = self.rating.map(|rating| usize::from(rating) - 1);
        let form = VolunteerForm {
            charity_name: self.charity,
            hours_volunteered: self.hours,
            date: self.date,
        };
        (form, star)
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearArgs {
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

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
