//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "schoolsync",
    version,
    about = "Query and update school administration data through synchronization stores"
)]
pub struct Cli {
    /// Config file (default: <config dir>/schoolsync/config.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a filtered list.
    List {
        #[arg(value_enum)]
        domain: DomainArg,

        /// Case-insensitive search over names and titles.
        #[arg(long)]
        search: Option<String>,

        /// Status restriction, e.g. `pending`, or `all`.
        #[arg(long)]
        status: Option<String>,
    },

    /// Fetch one entity by id.
    Show {
        #[arg(value_enum)]
        domain: DomainArg,
        id: String,
    },

    /// Approve a pending leave request.
    Approve {
        id: String,
        #[arg(long)]
        note: Option<String>,
    },

    /// Reject a pending leave request.
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },

    /// Record a fee payment in minor units.
    Pay { id: String, amount: u64 },

    /// Run the walkthrough scenarios and print every list they touch.
    Demo,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DomainArg {
    Teachers,
    Classes,
    Students,
    Exams,
    Fees,
    Leaves,
}
