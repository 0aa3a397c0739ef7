//! Command-line surface for subtrack.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use subtrack_core::subscription::parse_end_date;

#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "Track subscriptions and get reminded before they expire")]
#[command(version)]
pub struct Cli {
    /// Subscription data file (overrides SUBTRACK_DATA_FILE)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Scan now, then every scan interval until interrupted (default)
    Run,

    /// Open subscription manager
    Manage,

    /// View all subscriptions
    List {
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Add a subscription
    Add {
        name: String,
        /// Expiration date (YYYY-MM-DD)
        end_date: String,
    },

    /// Remove the subscription at a position shown by `list`
    Remove { index: usize },

    /// Run a single expiration scan
    Check {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Table,
    Json,
}

fn parse_today(raw: &str) -> Result<NaiveDate, String> {
    parse_end_date(raw).ok_or_else(|| format!("`{raw}` is not a YYYY-MM-DD date"))
}
