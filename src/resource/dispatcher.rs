//! Type dispatcher
//!
//! Table from resource kind to fetcher. Adding a kind is a table insertion.

use super::endpoint::EndpointTable;
use super::fetcher::{EndpointFetcher, Fetcher};
use super::types::{Item, PageRequest, ResourceKind};
use crate::envelope::EnvelopeDecoder;
use crate::error::{Error, Result};
use crate::http::Transport;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Selects the fetcher for a kind and delegates to it
#[derive(Clone, Default)]
pub struct Dispatcher {
    table: HashMap<ResourceKind, Arc<dyn Fetcher>>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with an `EndpointFetcher` for every kind in the table
    pub fn standard(
        transport: Arc<dyn Transport>,
        decoder: EnvelopeDecoder,
        endpoints: &EndpointTable,
    ) -> Self {
        let mut dispatcher = Self::new();
        for (kind, endpoint) in endpoints.entries() {
            let fetcher = EndpointFetcher::new(endpoint.clone(), Arc::clone(&transport), decoder);
            dispatcher.register(kind, Arc::new(fetcher));
        }
        dispatcher
    }

    /// Insert or replace the fetcher for a kind
    pub fn register(
        &mut self,
        kind: ResourceKind,
        fetcher: Arc<dyn Fetcher>,
    ) -> Option<Arc<dyn Fetcher>> {
        self.table.insert(kind, fetcher)
    }

    /// Builder-style `register`
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, fetcher: Arc<dyn Fetcher>) -> Self {
        self.register(kind, fetcher);
        self
    }

    /// Whether a fetcher is registered for the kind
    pub fn supports(&self, kind: ResourceKind) -> bool {
        self.table.contains_key(&kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds: Vec<_> = self.table.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Fetch one page for a kind
    ///
    /// A kind with no registered fetcher yields an empty page.
    pub async fn dispatch(&self, kind: ResourceKind, request: &PageRequest) -> Result<Vec<Item>> {
        match self.table.get(&kind) {
            Some(fetcher) => fetcher.fetch(request).await,
            None => {
                let err = Error::unknown_kind(kind.as_str());
                warn!("{err}, returning an empty page");
                Ok(Vec::new())
            }
        }
    }

    /// Fetch one page for a kind given by name
    ///
    /// Unrecognized names yield an empty page.
    pub async fn dispatch_named(&self, kind: &str, request: &PageRequest) -> Result<Vec<Item>> {
        match kind.parse::<ResourceKind>() {
            Ok(kind) => self.dispatch(kind, request).await,
            Err(err) => {
                warn!("{err}, returning an empty page");
                Ok(Vec::new())
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("kinds", &self.kinds())
            .finish()
    }
}
