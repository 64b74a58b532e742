//! Resource module
//!
//! Resource kinds, page requests, per-kind fetchers and the dispatcher.
//!
//! # Overview
//!
//! - `ResourceKind` - closed set of listable categories
//! - `Endpoint` - one upstream call shape with its fixed parameters
//! - `EndpointFetcher` - issues one call and decodes its envelope
//! - `Dispatcher` - kind to fetcher table; unknown kinds degrade to empty

mod dispatcher;
mod endpoint;
mod fetcher;
mod types;

pub use dispatcher::Dispatcher;
pub use endpoint::{Endpoint, EndpointTable, ItemShape};
pub use fetcher::{EndpointFetcher, Fetcher};
pub use types::{
    Device, Filters, Item, PageQuery, PageRequest, ResourceId, ResourceKind, Site,
};

#[cfg(test)]
mod tests;
