//! CLI module
//!
//! Command-line interface for issuing queries.
//!
//! # Commands
//!
//! - `get` - Execute a GET query and print the response
//! - `post` - Execute a POST query and print the response
//! - `extract` - Print the value at a key path of a response
//! - `cursor` - Walk a cursor-paginated query and print each page

mod commands;
mod runner;

pub use commands::{Cli, Commands, MethodArg, OutputFormat};
pub use runner::Runner;
