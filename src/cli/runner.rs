//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ClientConfig};
use crate::cursor::{CursorQuery, CursorResponse};
use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::types::Method;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let executor = self.build_executor()?;

        match &self.cli.command {
            Commands::Get { query } => self.execute(&executor, query, Method::GET).await,
            Commands::Post { query } => self.execute(&executor, query, Method::POST).await,
            Commands::Extract {
                query,
                path,
                method,
            } => self.extract(&executor, query, path, (*method).into()).await,
            Commands::Cursor {
                base,
                max_items,
                start_cursor,
                method,
            } => {
                let mut request = CursorQuery::new(base.as_str())
                    .start_cursor(*start_cursor)
                    .method((*method).into());
                if let Some(max_items) = max_items {
                    request = request.max_items(*max_items);
                }
                self.cursor(&executor, request).await
            }
        }
    }

    /// Resolve the client configuration from the config file and flags
    pub(crate) fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url = Some(base_url.clone());
        }
        if self.cli.strict {
            config.swallow_remote_failures = false;
        }

        Ok(config)
    }

    fn build_executor(&self) -> Result<QueryExecutor> {
        let config = self.client_config()?;
        debug!(
            "Using base URL {:?}, swallow_remote_failures={}",
            config.base_url, config.swallow_remote_failures
        );

        let executor = QueryExecutor::from_config(&config)?;
        if self.cli.log_queries {
            executor.observer().set(|obs| {
                info!(
                    method = %obs.method,
                    query = obs.query,
                    bytes = obs.response.len(),
                    "Query executed"
                );
            });
        }
        Ok(executor)
    }

    async fn execute(&self, executor: &QueryExecutor, query: &str, method: Method) -> Result<()> {
        match executor.try_execute_tree(query, method).await? {
            Some(tree) => self.output(&tree),
            None => warn!("{} {} produced no result", method, query),
        }
        Ok(())
    }

    async fn extract(
        &self,
        executor: &QueryExecutor,
        query: &str,
        path: &[String],
        method: Method,
    ) -> Result<()> {
        let found: Option<Value> = executor
            .try_execute_typed_at_path(query, method, path)
            .await?;

        match found {
            Some(value) => self.output(&value),
            None => {
                warn!("Nothing found at {}", path.join("."));
                self.output(&Value::Null);
            }
        }
        Ok(())
    }

    async fn cursor(&self, executor: &QueryExecutor, request: CursorQuery) -> Result<()> {
        let token = CancellationToken::new();
        let request = request.cancel_on(token.clone());

        let interrupt = tokio::spawn({
            let token = token.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, finishing after the current page");
                    token.cancel();
                }
            }
        });

        let pages = executor
            .collect_raw_pages::<CursorResponse<Value>>(&request)
            .await;
        interrupt.abort();

        for raw in pages? {
            let page: Value = serde_json::from_str(&raw)?;
            self.output(&page);
        }
        Ok(())
    }

    fn output(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}
