//! Query execution
//!
//! [`QueryExecutor`] issues one logical query at a time through a
//! [`Transport`], normalizes transport failures into
//! [`Error::RemoteService`], reports successful round-trips to the optional
//! observer and deserializes the response on request.
//!
//! Every throwing operation has a `try_` twin returning `Result<Option<T>>`.
//! The twin only differs for remote failures, which it hands to the
//! [`ErrorPolicy`]: swallowed failures come back as `Ok(None)`. Argument and
//! deserialization errors propagate from both.

use crate::config::ClientConfig;
use crate::decode::{ConverterSet, JsonDeserializer};
use crate::error::{Error, Result};
use crate::extract;
use crate::http::{HttpTransport, Transport};
use crate::observer::ObserverSlot;
use crate::policy::ErrorPolicy;
use crate::types::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Executes queries and deserializes their responses
#[derive(Clone)]
pub struct QueryExecutor {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) policy: ErrorPolicy,
    pub(crate) observer: ObserverSlot,
    pub(crate) deserializer: JsonDeserializer,
    pub(crate) cursor_converters: ConverterSet,
}

impl QueryExecutor {
    /// Create an executor over a transport, swallowing remote failures
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_transport(Arc::new(transport))
    }

    /// Create an executor over a shared transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: ErrorPolicy::default(),
            observer: ObserverSlot::new(),
            deserializer: JsonDeserializer::new(),
            cursor_converters: ConverterSet::cursor_defaults(),
        }
    }

    /// Create an executor backed by an [`HttpTransport`] built from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(config.clone())?;
        Ok(Self::new(transport).with_policy(config.error_policy()))
    }

    /// Use a specific error policy (clones share its switch)
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a specific observer slot (clones share the slot)
    #[must_use]
    pub fn with_observer_slot(mut self, observer: ObserverSlot) -> Self {
        self.observer = observer;
        self
    }

    /// Converters applied to cursor page responses
    #[must_use]
    pub fn with_cursor_converters(mut self, converters: ConverterSet) -> Self {
        self.cursor_converters = converters;
        self
    }

    /// The error policy consulted on remote failures
    pub fn policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    /// The observer slot notified after each successful query
    pub fn observer(&self) -> &ObserverSlot {
        &self.observer
    }

    // ========================================================================
    // Raw text
    // ========================================================================

    /// Execute a query and return the raw response text
    pub async fn execute(&self, query: &str, method: Method) -> Result<String> {
        require_query(query)?;

        debug!("Executing {} {}", method, query);
        let text = self
            .transport
            .send(query, method)
            .await
            .map_err(|e| e.into_remote(query, method))?;

        self.observer.notify(query, method, &text);
        Ok(text)
    }

    /// Like [`execute`](Self::execute), with remote failures gated by the policy
    pub async fn try_execute(&self, query: &str, method: Method) -> Result<Option<String>> {
        self.policy.absorb(self.execute(query, method).await)
    }

    /// Execute a GET query and return the raw response text
    pub async fn get_json(&self, query: &str) -> Result<String> {
        self.execute(query, Method::GET).await
    }

    /// Execute a POST query and return the raw response text
    pub async fn post_json(&self, query: &str) -> Result<String> {
        self.execute(query, Method::POST).await
    }

    // ========================================================================
    // JSON tree
    // ========================================================================

    /// Execute a query and parse the response into a JSON tree
    pub async fn execute_tree(&self, query: &str, method: Method) -> Result<Value> {
        let text = self.execute(query, method).await?;
        self.deserializer.parse_tree(&text)
    }

    /// Like [`execute_tree`](Self::execute_tree), with remote failures gated by the policy
    pub async fn try_execute_tree(&self, query: &str, method: Method) -> Result<Option<Value>> {
        match self.try_execute(query, method).await? {
            Some(text) => Ok(Some(self.deserializer.parse_tree(&text)?)),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Typed
    // ========================================================================

    /// Execute a query and deserialize the response into `T`
    pub async fn execute_typed<T: DeserializeOwned>(
        &self,
        query: &str,
        method: Method,
        converters: &ConverterSet,
    ) -> Result<T> {
        let text = self.execute(query, method).await?;
        self.deserializer.deserialize(&text, converters)
    }

    /// Like [`execute_typed`](Self::execute_typed), with remote failures gated by the policy.
    ///
    /// A literal `null` response also yields `Ok(None)`.
    pub async fn try_execute_typed<T: DeserializeOwned>(
        &self,
        query: &str,
        method: Method,
        converters: &ConverterSet,
    ) -> Result<Option<T>> {
        match self.try_execute(query, method).await? {
            Some(text) => self.deserializer.deserialize::<Option<T>>(&text, converters),
            None => Ok(None),
        }
    }

    /// Execute a GET query into `T` without custom converters
    pub async fn get<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        self.execute_typed(query, Method::GET, &ConverterSet::new())
            .await
    }

    /// Execute a POST query into `T` without custom converters
    pub async fn post<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        self.execute_typed(query, Method::POST, &ConverterSet::new())
            .await
    }

    // ========================================================================
    // Typed at path
    // ========================================================================

    /// Execute a query and extract the value at `path` as `T`.
    ///
    /// Returns `Ok(None)` when any key of the path is absent.
    pub async fn execute_typed_at_path<T, S>(
        &self,
        query: &str,
        method: Method,
        path: &[S],
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        let tree = self.execute_tree(query, method).await?;
        extract::extract(&tree, path)
    }

    /// Like [`execute_typed_at_path`](Self::execute_typed_at_path), with remote
    /// failures gated by the policy
    pub async fn try_execute_typed_at_path<T, S>(
        &self,
        query: &str,
        method: Method,
        path: &[S],
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        match self.try_execute_tree(query, method).await? {
            Some(tree) => extract::extract(&tree, path),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Multipart
    // ========================================================================

    /// POST `binaries` as multipart parts named `content_id`
    pub async fn execute_multipart(
        &self,
        query: &str,
        binaries: &[Vec<u8>],
        content_id: &str,
    ) -> Result<String> {
        require_query(query)?;

        let method = Method::POST;
        debug!(
            "Executing multipart {} {} ({} parts named '{}')",
            method,
            query,
            binaries.len(),
            content_id
        );
        let text = self
            .transport
            .send_multipart(query, content_id, binaries, method)
            .await
            .map_err(|e| e.into_remote(query, method))?;

        self.observer.notify(query, method, &text);
        Ok(text)
    }

    /// Like [`execute_multipart`](Self::execute_multipart), with remote failures
    /// gated by the policy
    pub async fn try_execute_multipart(
        &self,
        query: &str,
        binaries: &[Vec<u8>],
        content_id: &str,
    ) -> Result<Option<String>> {
        self.policy
            .absorb(self.execute_multipart(query, binaries, content_id).await)
    }

    /// POST a multipart query and deserialize the response into `T`
    pub async fn execute_multipart_typed<T: DeserializeOwned>(
        &self,
        query: &str,
        binaries: &[Vec<u8>],
        content_id: &str,
        converters: &ConverterSet,
    ) -> Result<T> {
        let text = self.execute_multipart(query, binaries, content_id).await?;
        self.deserializer.deserialize(&text, converters)
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("policy", &self.policy)
            .field("observer", &self.observer)
            .field("cursor_converters", &self.cursor_converters)
            .finish_non_exhaustive()
    }
}

/// Reject queries that could not have been built from valid arguments
fn require_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(Error::invalid_argument(
            "At least one of the arguments provided to the query was invalid",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
