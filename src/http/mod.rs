//! HTTP transport module
//!
//! Provides the [`Transport`] boundary used by the query executor and a
//! reqwest-backed implementation with retry and backoff.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connect errors
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Multipart Uploads**: Binary payloads sent as form parts

mod client;
mod transport;

pub use client::HttpTransport;
pub use transport::Transport;
