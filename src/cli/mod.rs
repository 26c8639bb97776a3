use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rivulet-relay")]
#[command(about = "Relay new RSS/Atom entries to a webhook", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/rivulet-relay/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Check feeds on a schedule and relay new entries (default)
    Run,
    /// Check feeds once, deliver everything found, and exit
    Once,
}
