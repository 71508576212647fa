//! Transport boundary
//!
//! A transport executes exactly one logical HTTP request and hands back the
//! raw response text. Authentication, connection handling and socket-level
//! retries all live behind this trait.

use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;

/// Executes single HTTP requests on behalf of the query executor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `query` with `method` and return the response body.
    ///
    /// Non-2xx responses fail with [`Error::HttpStatus`](crate::Error::HttpStatus);
    /// connectivity problems fail with another transport error variant.
    async fn send(&self, query: &str, method: Method) -> Result<String>;

    /// Send `binaries` as multipart form parts named `content_id`
    async fn send_multipart(
        &self,
        query: &str,
        content_id: &str,
        binaries: &[Vec<u8>],
        method: Method,
    ) -> Result<String>;
}
