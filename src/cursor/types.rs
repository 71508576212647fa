//! Cursor pagination types and traits

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::types::Method;

/// Previous-cursor value before the first page; never returned by a server
pub const UNSTARTED_CURSOR: i64 = -2;

/// Cursor requesting the first page
pub const DEFAULT_START_CURSOR: i64 = -1;

// ============================================================================
// Traits
// ============================================================================

/// A response page carrying previous/next cursors
pub trait CursorPage: DeserializeOwned {
    /// Cursor of the page before this one
    fn previous_cursor(&self) -> i64;

    /// Cursor of the page after this one
    fn next_cursor(&self) -> i64;

    /// Number of items contained in this page
    fn item_count(&self) -> usize;

    /// Attach the raw response text this page was decoded from
    fn set_raw_json(&mut self, _raw: String) {}
}

/// A cursor page whose items can be flattened into one sequence
pub trait CursorItems: CursorPage {
    /// Item type contained in the page
    type Item;

    /// Consume the page, returning its items
    fn into_items(self) -> Vec<Self::Item>;
}

// ============================================================================
// Generic page DTO
// ============================================================================

/// Cursor page with its items under `ids`, `users`, `lists` or `items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorResponse<T> {
    /// Cursor of the previous page
    pub previous_cursor: i64,
    /// Cursor of the next page
    pub next_cursor: i64,
    /// Items of this page
    #[serde(default = "Vec::new", alias = "ids", alias = "users", alias = "lists")]
    pub items: Vec<T>,
    /// Raw response text, when captured
    #[serde(skip)]
    pub raw_json: Option<String>,
}

impl<T: DeserializeOwned> CursorPage for CursorResponse<T> {
    fn previous_cursor(&self) -> i64 {
        self.previous_cursor
    }

    fn next_cursor(&self) -> i64 {
        self.next_cursor
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn set_raw_json(&mut self, raw: String) {
        self.raw_json = Some(raw);
    }
}

impl<T: DeserializeOwned> CursorItems for CursorResponse<T> {
    type Item = T;

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

// ============================================================================
// Walk state
// ============================================================================

/// Progress of one cursor walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    /// Previous cursor reported by the last page
    pub previous: i64,
    /// Cursor to request next
    pub next: i64,
    /// Items seen across accumulated pages
    pub items_processed: usize,
}

impl CursorState {
    /// Create the state for a walk starting at `start_cursor`
    pub fn new(start_cursor: i64) -> Self {
        Self {
            previous: UNSTARTED_CURSOR,
            next: start_cursor,
            items_processed: 0,
        }
    }

    /// Check whether another page should be requested
    pub fn should_continue(&self, max_items: usize) -> bool {
        self.previous != self.next && self.items_processed < max_items
    }

    /// Build the query for the next page from a normalized base query
    pub fn page_query(&self, normalized_base: &str) -> String {
        format!("{normalized_base}cursor={}", self.next)
    }

    /// Record an accepted page
    pub fn advance<P: CursorPage>(&mut self, page: &P) {
        self.items_processed = self.items_processed.saturating_add(page.item_count());
        self.previous = page.previous_cursor();
        self.next = page.next_cursor();
    }
}

/// Check for the page a server returns when there is nothing at all
pub fn is_empty_terminal<P: CursorPage>(page: &P) -> bool {
    page.item_count() == 0 && page.next_cursor() == 0 && page.previous_cursor() == -1
}

/// Prepare a base query so `cursor=<n>` can be appended.
///
/// Queries already ending in `?` or `&` are returned unchanged. A query with
/// parameters gets `&`. A query without any `?` gets `?`, so `search.json`
/// pages as `search.json?cursor=-1` rather than `search.jsoncursor=-1`.
pub fn normalize_base_query(query: &str) -> String {
    let mut normalized = query.to_string();
    if query.ends_with('?') || query.ends_with('&') {
        return normalized;
    }
    normalized.push(if query.contains('?') { '&' } else { '?' });
    normalized
}

// ============================================================================
// Request
// ============================================================================

/// A cursor walk request
#[derive(Debug, Clone)]
pub struct CursorQuery {
    base: String,
    max_items: usize,
    start_cursor: i64,
    method: Method,
    cancel: Option<CancellationToken>,
    capture_raw: bool,
}

impl CursorQuery {
    /// Walk `base` from the first page without an item limit
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            max_items: usize::MAX,
            start_cursor: DEFAULT_START_CURSOR,
            method: Method::GET,
            cancel: None,
            capture_raw: false,
        }
    }

    /// Stop requesting pages once this many items were collected
    #[must_use]
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Cursor of the first requested page
    #[must_use]
    pub fn start_cursor(mut self, cursor: i64) -> Self {
        self.start_cursor = cursor;
        self
    }

    /// HTTP method used for every page
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Stop the walk before the next request once `token` is cancelled
    #[must_use]
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Store each page's raw text on typed pages
    #[must_use]
    pub fn capture_raw(mut self, capture: bool) -> Self {
        self.capture_raw = capture;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn item_limit(&self) -> usize {
        self.max_items
    }

    pub fn first_cursor(&self) -> i64 {
        self.start_cursor
    }

    pub fn http_method(&self) -> Method {
        self.method
    }

    pub fn captures_raw(&self) -> bool {
        self.capture_raw
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
