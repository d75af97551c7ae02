use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "khushoo-reminder", version, about = "Emails prayer reminders ahead of each daily prayer")]
pub struct Cli {
    /// Read configuration from this dotenv file before the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the reminder worker and poll every minute until Ctrl-C
    Run,
    /// Run a single reminder cycle now and print its summary
    Once,
    /// Register or update a user's location
    SaveLocation {
        #[arg(long)]
        email: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        country: String,
    },
    /// List registered users
    Users,
    /// Show today's prayer times and reminder instants for a location
    Timings {
        #[arg(long)]
        city: String,
        #[arg(long)]
        country: String,
    },
}
