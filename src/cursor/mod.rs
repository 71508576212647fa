//! Cursor pagination
//!
//! Walks a cursor-paginated endpoint by repeatedly executing
//! `<base>cursor=<n>` until the cursors stop advancing, the item budget is
//! spent or a page comes back empty.
//!
//! # Overview
//!
//! Any response type implementing [`CursorPage`] can be collected. The walk
//! goes through the executor's policy-gated path, so a swallowed remote
//! failure ends it with the pages gathered so far while a strict policy
//! surfaces the failure instead.

mod driver;
mod types;

pub use types::{
    is_empty_terminal, normalize_base_query, CursorItems, CursorPage, CursorQuery,
    CursorResponse, CursorState, DEFAULT_START_CURSOR, UNSTARTED_CURSOR,
};
