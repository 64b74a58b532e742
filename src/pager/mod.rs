//! Pagination engine
//!
//! Resource-agnostic page loader. Given a "load one page" capability it
//! tracks page numbers, detects the end of data and computes where to
//! resume after an invalidation.
//!
//! # Overview
//!
//! - `PageSource` - the one capability the engine depends on
//! - `PagingSession` - one listing bound to one fixed query
//! - `Page` - items plus `prev_key` / `next_key`
//! - `PagingState` - loaded pages and the consumer's anchor, used for the
//!   refresh key
//!
//! A session never changes its query. A new filter, keyword or kind means
//! a new session.

mod session;
mod types;

pub use session::{PageSource, PagingSession};
pub use types::{refresh_key, LoadResult, LoaderState, Page, PagingState};
