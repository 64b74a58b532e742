// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # devpage
//!
//! Authenticated, paginated data layer for device and site list endpoints.
//!
//! ## Features
//!
//! - **Token Store**: one shared credential slot, read on every request
//! - **Request Authorization**: bearer + locale headers, exempt hosts untouched
//! - **Envelope Decoding**: `{code, data, message}` turned into typed results
//! - **Kind Dispatch**: one table from resource kind to fetcher
//! - **Page Sessions**: numbered pages, end detection, refresh after invalidation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use devpage::{ClientConfig, DataClient, PageQuery, ResourceKind};
//!
//! #[tokio::main]
//! async fn main() -> devpage::Result<()> {
//!     let client = DataClient::new(ClientConfig::from_file("devpage.yaml")?)?;
//!     client.set_credential("eyJhbGciOi...");
//!
//!     let session = client.open_session(
//!         ResourceKind::Lamp,
//!         PageQuery::new().road_id("42"),
//!         None,
//!     )?;
//!     let first = session.load(None).await;
//!     if let Some(page) = first.page() {
//!         println!("{} lamps, more: {}", page.len(), !page.is_last());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        DataClient                               │
//! │  request_page()   open_session() → PagingSession   invalidate() │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Envelope    │ Resource  │   Pager     │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Token    │ Transport │ code/data/msg │ Endpoints │ Page keys   │
//! │ Bearer   │ reqwest   │ Bare / paged  │ Fetchers  │ Generations │
//! │ Locale   │           │ lists         │ Dispatch  │ Refresh key │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Token store and request authorization
pub mod auth;

/// HTTP transport
pub mod http;

/// Response envelope decoding
pub mod envelope;

/// Resource kinds, fetchers and dispatch
pub mod resource;

/// Pagination engine
pub mod pager;

/// Consumer facade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{Credential, RequestAuthorizer, TokenStore};
pub use client::{DataClient, KindSource};
pub use config::ClientConfig;
pub use envelope::EnvelopeDecoder;
pub use pager::{LoadResult, LoaderState, Page, PageSource, PagingSession};
pub use resource::{Dispatcher, Item, PageQuery, PageRequest, ResourceKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
