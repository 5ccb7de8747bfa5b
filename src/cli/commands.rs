//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Feedkit CLI
#[derive(Parser, Debug)]
#[command(name = "feedkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a feed and scroll it to the last page
    Scroll {
        /// Feed definition file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base URL of a paged API (overrides the config file)
        #[arg(short, long)]
        url: Option<String>,

        /// Stop after this many pages (0 = until the last page)
        #[arg(long, default_value = "0")]
        max_pages: u32,

        /// Items in the built-in dataset when no source is given
        #[arg(long, default_value = "22")]
        items: u32,

        /// Page size of the built-in dataset
        #[arg(long, default_value = "10")]
        per_page: u32,
    },

    /// Serve a mock paged API from a generated dataset
    MockServe {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Items in the generated dataset
        #[arg(long, default_value = "22")]
        items: u32,

        /// Items per page
        #[arg(long, default_value = "10")]
        per_page: u32,

        /// Artificial response latency in milliseconds
        #[arg(long, default_value = "0")]
        latency_ms: u64,
    },

    /// Validate a feed definition file
    Validate {
        /// Feed definition file (YAML)
        #[arg(short, long)]
        config: PathBuf,
    },
}
