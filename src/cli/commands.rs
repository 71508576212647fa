//! CLI commands and argument parsing

use crate::types::Method;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query and cursor pagination CLI
#[derive(Parser, Debug)]
#[command(name = "cursorkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL prepended to relative queries (overrides the config file)
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// Propagate remote failures instead of swallowing them
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log every executed query with the size of its response
    #[arg(long, global = true)]
    pub log_queries: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a GET query
    Get {
        /// Query, relative to the base URL or absolute
        query: String,
    },

    /// Execute a POST query
    Post {
        /// Query, relative to the base URL or absolute
        query: String,
    },

    /// Print the value found at a key path of the response
    Extract {
        /// Query, relative to the base URL or absolute
        query: String,

        /// Object keys leading to the value
        #[arg(required = true)]
        path: Vec<String>,

        /// HTTP method
        #[arg(short, long, default_value = "get")]
        method: MethodArg,
    },

    /// Walk a cursor-paginated query, printing one page per line
    Cursor {
        /// Query without the cursor parameter
        base: String,

        /// Stop once this many items were collected
        #[arg(long)]
        max_items: Option<usize>,

        /// Cursor of the first page
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        start_cursor: i64,

        /// HTTP method
        #[arg(short, long, default_value = "get")]
        method: MethodArg,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// HTTP method argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MethodArg {
    Get,
    Post,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Get => Method::GET,
            MethodArg::Post => Method::POST,
        }
    }
}
