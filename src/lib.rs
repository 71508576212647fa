// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # cursorkit
//!
//! Query execution and cursor pagination for REST APIs that page through
//! results with integer `previous_cursor`/`next_cursor` pairs.
//!
//! ## Features
//!
//! - **Query Execution**: Raw text, JSON tree, typed and path-extracted results
//! - **Uniform Failure Policy**: Remote failures either propagate or become `None`
//! - **Cursor Pagination**: Raw pages, typed pages or flattened items
//! - **Observation**: Optional hook receiving every query and its response
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cursorkit::{ClientConfig, CursorQuery, CursorResponse, QueryExecutor, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .base_url("https://api.twitter.com/1.1")
//!         .header("Authorization", "Bearer ...")
//!         .build();
//!     let executor = QueryExecutor::from_config(&config)?;
//!
//!     let request = CursorQuery::new("followers/ids.json?screen_name=rustlang").max_items(10_000);
//!     let ids = executor
//!         .collect_page_items::<CursorResponse<u64>>(&request)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Cursor Pagination Driver                    │
//! │   collect_raw_pages   collect_typed_pages   collect_items    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ try_execute
//! ┌──────────────┬───────────────┴──────────┬────────────────────┐
//! │ ErrorPolicy  │      QueryExecutor       │   ObserverSlot     │
//! ├──────────────┼──────────────────────────┼────────────────────┤
//! │ swallow or   │ execute / tree / typed / │ (query, method,    │
//! │ propagate    │ at path / multipart      │  response) hook    │
//! └──────────────┴───────────┬──────────────┴────────────────────┘
//!                            │
//!              ┌─────────────┴─────────────┐
//!              │ Transport   │  Decode     │
//!              │ (reqwest)   │  (serde)    │
//!              └───────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document CLI argument structs and cursor accessors, then drop this allow

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Remote failure policy
pub mod policy;

/// Query observation hook
pub mod observer;

/// Response deserialization and field converters
pub mod decode;

/// Path extraction from JSON trees
pub mod extract;

/// HTTP transport with retry and backoff
pub mod http;

/// Query executor
pub mod executor;

/// Cursor pagination
pub mod cursor;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, ClientConfig};
pub use cursor::{CursorItems, CursorPage, CursorQuery, CursorResponse};
pub use executor::QueryExecutor;
pub use observer::{ObserverSlot, QueryObservation};
pub use policy::ErrorPolicy;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
