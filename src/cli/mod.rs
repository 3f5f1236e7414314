//! CLI module for fieldguard
//!
//! Provides command-line interface for:
//! - check: Load every schema and print a summary
//! - validate: Serve validation requests, one JSON line each, until EOF

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, check, handle_request, run, run_command, schema_summary, serve, validate, ValidationRequest};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_response};
