//! CLI module
//!
//! Command-line interface for driving feeds from a terminal.
//!
//! # Commands
//!
//! - `scroll` - Load a feed and scroll it to the last page
//! - `mock-serve` - Serve a mock paged API from a generated dataset
//! - `validate` - Check a feed definition file

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{serve, MockServerConfig};
