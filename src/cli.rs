use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "triedex")]
#[command(about = "triedex - In-memory autocomplete index driven by line commands on stdin")]
#[command(version = env!("VERSION"))]
pub struct Cli {
    /// Path to one or more config files (merged in order).
    #[arg(long, action = clap::ArgAction::Append)]
    pub config: Vec<PathBuf>,

    /// CSV file of word,frequency rows to load at startup. Overrides `data_file` in the config.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Save the index back to the data file on exit.
    #[arg(long)]
    pub save_on_exit: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a sample config file.
    NewConfig {
        /// Output path for config file.
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,
    },
}
