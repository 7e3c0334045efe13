use crate::capture::InputKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "scan-relocate")]
#[command(version)]
#[command(about = "Scan-to-confirm relocation tracking for warehouse moves")]
#[command(long_about = "scan-relocate guides an operator through location moves: scan the source \
                       location, carry the displayed quantity to the displayed destination, then \
                       scan the destination to confirm. Get started with 'scan-relocate scan'.")]
pub struct Cli {
    /// Configuration file to load instead of ./scan-relocate.toml
    #[arg(long, global = true, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,

    /// Reference table overriding the configured one
    #[arg(long, global = true, help = "Semicolon-separated table: source;quantity;destination")]
    pub table: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive scanning session reading codes from stdin
    Scan {
        /// How codes arrive on stdin
        #[arg(long, value_enum, default_value_t = InputKind::Keyboard, help = "keyboard: scanner typing codes; manual: prompted entry")]
        input: InputKind,
        /// Print one JSON object per outcome instead of operator text
        #[arg(long, help = "Emit outcomes as JSON lines")]
        json: bool,
    },
    /// Feed a recorded scan log (one code per line) through a fresh session
    Replay {
        /// Scan log to replay
        file: PathBuf,
        /// Print one JSON object per outcome instead of operator text
        #[arg(long, help = "Emit outcomes as JSON lines")]
        json: bool,
    },
    /// Show where a source location code is headed
    Lookup {
        /// Source location code, as scanned or typed
        code: String,
        #[arg(long, help = "Print the matching record as JSON")]
        json: bool,
    },
    /// List the loaded reference table
    Table {
        /// Maximum number of rows to print
        #[arg(long, help = "Only print the first N rows")]
        limit: Option<usize>,
    },
    /// Print the normalized form of codes
    Normalize {
        /// Codes to normalize
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, help = "Force initialization, overwriting existing configuration")]
        force: bool,
        /// Show what would be created without making changes
        #[arg(long, help = "Show what would be created without making changes")]
        dry_run: bool,
    },
}
