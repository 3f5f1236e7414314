//! CLI argument definitions using clap
//!
//! Commands:
//! - fieldguard check --config <path>
//! - fieldguard validate --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fieldguard - schema-driven document validation
#[derive(Parser, Debug)]
#[command(name = "fieldguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every schema and print a summary
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./fieldguard.json")]
        config: PathBuf,
    },

    /// Validate one JSON request per stdin line
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./fieldguard.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
