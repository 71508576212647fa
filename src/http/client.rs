//! HTTP transport with retry and backoff
//!
//! Provides a reqwest-based transport that handles:
//! - Automatic retries with configurable backoff
//! - Resolution of relative queries against a base URL
//! - Multipart uploads
//! - Error classification for retry decisions

use super::transport::Transport;
use crate::config::ClientConfig;
use crate::error::{is_retryable_status, Error, Result};
use crate::types::{BackoffType, Method};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Request body for a single attempt
enum Body<'a> {
    Empty,
    Multipart {
        content_id: &'a str,
        binaries: &'a [Vec<u8>],
    },
}

impl Body<'_> {
    fn attach(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Body::Empty => req,
            Body::Multipart {
                content_id,
                binaries,
            } => {
                let form = binaries.iter().fold(Form::new(), |form, binary| {
                    form.part(content_id.to_string(), Part::bytes(binary.clone()))
                });
                req.multipart(form)
            }
        }
    }
}

/// reqwest-backed [`Transport`]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the transport configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn request(&self, method: Method, query: &str, body: Body<'_>) -> Result<String> {
        let full_url = self.build_url(query)?;
        let max_retries = self.config.max_retries;
        let timeout = self.config.timeout();

        let mut last_error = None;
        let mut attempt = 0;

        while attempt <= max_retries {
            let mut req = self.client.request(method.into(), &full_url);

            for (key, value) in &self.config.headers {
                req = req.header(key.as_str(), value.as_str());
            }

            req = body.attach(req).timeout(timeout);

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(&response);
                        if attempt < max_retries {
                            warn!(
                                "Rate limited (429), attempt {}/{}, waiting {}s",
                                attempt + 1,
                                max_retries + 1,
                                retry_after
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    if is_retryable_status(status.as_u16()) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::http_status(status.as_u16(), ""));
                        continue;
                    }

                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::http_status(status.as_u16(), body));
                    }

                    debug!("Request succeeded: {} {}", method, full_url);
                    return Ok(response.text().await?);
                }
                Err(e) if e.is_builder() => {
                    return Err(Error::invalid_argument(format!(
                        "Cannot build a request for '{query}': {e}"
                    )));
                }
                Err(e) => {
                    if e.is_timeout() {
                        let timeout_ms = timeout.as_millis() as u64;
                        if attempt < max_retries {
                            let delay = self.calculate_backoff(attempt);
                            warn!(
                                "Request timeout, attempt {}/{}, retrying in {:?}",
                                attempt + 1,
                                max_retries + 1,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            last_error = Some(Error::Timeout { timeout_ms });
                            continue;
                        }
                        return Err(Error::Timeout { timeout_ms });
                    }

                    if e.is_connect() && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Connection error, attempt {}/{}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::Http(e));
                        continue;
                    }

                    return Err(Error::Http(e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::transport("retries exhausted")))
    }

    /// Build full URL from a query
    fn build_url(&self, query: &str) -> Result<String> {
        if query.starts_with("http://") || query.starts_with("https://") {
            return Ok(query.to_string());
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let query = query.trim_start_matches('/');
                Ok(format!("{base}/{query}"))
            }
            None => Err(Error::invalid_argument(format!(
                "Relative query '{query}' needs a base_url"
            ))),
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff = &self.config.backoff;
        let initial = backoff.initial();
        let delay = match backoff.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };

        std::cmp::min(delay, backoff.max())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, query: &str, method: Method) -> Result<String> {
        self.request(method, query, Body::Empty).await
    }

    async fn send_multipart(
        &self,
        query: &str,
        content_id: &str,
        binaries: &[Vec<u8>],
        method: Method,
    ) -> Result<String> {
        self.request(
            method,
            query,
            Body::Multipart {
                content_id,
                binaries,
            },
        )
        .await
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.config.base_url)
            .field("max_retries", &self.config.max_retries)
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
