//! Cursor walk over the query executor

use super::types::{
    is_empty_terminal, normalize_base_query, CursorItems, CursorPage, CursorQuery, CursorState,
};
use crate::error::Result;
use crate::executor::QueryExecutor;
use tracing::{debug, info};

impl QueryExecutor {
    /// Walk `request`, returning each accepted page with its raw text
    async fn walk_cursor<P: CursorPage>(
        &self,
        request: &CursorQuery,
    ) -> Result<Vec<(P, String)>> {
        let base = normalize_base_query(request.base());
        let max_items = request.item_limit();
        let mut state = CursorState::new(request.first_cursor());
        let mut pages = Vec::new();

        while state.should_continue(max_items) {
            if request.is_cancelled() {
                debug!("Cursor walk over {} cancelled after {} pages", base, pages.len());
                break;
            }

            let query = state.page_query(&base);
            let Some(text) = self.try_execute(&query, request.http_method()).await? else {
                debug!("Stopping cursor walk at {}: request failed", query);
                break;
            };

            let page: Option<P> = self.deserializer.deserialize(&text, &self.cursor_converters)?;
            let Some(page) = page else {
                debug!("Stopping cursor walk at {}: null page", query);
                break;
            };

            if is_empty_terminal(&page) {
                debug!("Stopping cursor walk at {}: empty terminal page", query);
                break;
            }

            state.advance(&page);
            debug!(
                "Page {} from {}: {} items, previous={}, next={}",
                pages.len() + 1,
                query,
                page.item_count(),
                state.previous,
                state.next
            );
            pages.push((page, text));
        }

        info!(
            "Cursor walk over {} finished: {} pages, {} items",
            base,
            pages.len(),
            state.items_processed
        );
        Ok(pages)
    }

    /// Collect the raw text of every page, decoding each as `P` for its cursors
    pub async fn collect_raw_pages<P: CursorPage>(
        &self,
        request: &CursorQuery,
    ) -> Result<Vec<String>> {
        let pages = self.walk_cursor::<P>(request).await?;
        Ok(pages.into_iter().map(|(_, raw)| raw).collect())
    }

    /// Collect every page as `P`
    pub async fn collect_typed_pages<P: CursorPage>(
        &self,
        request: &CursorQuery,
    ) -> Result<Vec<P>> {
        let pages = self.walk_cursor::<P>(request).await?;
        let capture_raw = request.captures_raw();
        Ok(pages
            .into_iter()
            .map(|(mut page, raw)| {
                if capture_raw {
                    page.set_raw_json(raw);
                }
                page
            })
            .collect())
    }

    /// Collect pages and flatten them through `extractor`, keeping at most
    /// the requested number of items
    pub async fn collect_items<P, I, F>(
        &self,
        request: &CursorQuery,
        mut extractor: F,
    ) -> Result<Vec<I>>
    where
        P: CursorPage,
        F: FnMut(P) -> Vec<I>,
    {
        let pages = self.collect_typed_pages::<P>(request).await?;
        let mut items: Vec<I> = pages.into_iter().flat_map(&mut extractor).collect();
        items.truncate(request.item_limit());
        Ok(items)
    }

    /// Collect the items of pages that know how to flatten themselves
    pub async fn collect_page_items<P: CursorItems>(
        &self,
        request: &CursorQuery,
    ) -> Result<Vec<P::Item>> {
        self.collect_items(request, P::into_items).await
    }
}
