//! Resource fetchers
//!
//! A fetcher turns one `PageRequest` into one upstream call and returns the
//! decoded items of that page.

use super::endpoint::{Endpoint, ItemShape};
use super::types::{Device, Item, PageRequest, Site};
use crate::envelope::EnvelopeDecoder;
use crate::error::Result;
use crate::http::Transport;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Loads one page of items for a fixed call shape
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the items of one page, in server order
    ///
    /// Failures propagate; an empty vector always means the server returned
    /// no items.
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Item>>;
}

/// Fetcher for one `Endpoint` over a shared transport
pub struct EndpointFetcher {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    decoder: EnvelopeDecoder,
}

impl EndpointFetcher {
    /// Create a fetcher
    pub fn new(endpoint: Endpoint, transport: Arc<dyn Transport>, decoder: EnvelopeDecoder) -> Self {
        Self {
            endpoint,
            transport,
            decoder,
        }
    }

    /// The endpoint this fetcher calls
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl Fetcher for EndpointFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Item>> {
        let outbound = self.endpoint.build_request(request);
        let response = self.transport.send(outbound).await?;

        let items: Vec<Item> = match self.endpoint.item_shape() {
            ItemShape::Device => self
                .decoder
                .decode_list::<Device>(&response)?
                .into_iter()
                .map(Item::Device)
                .collect(),
            ItemShape::Site => self
                .decoder
                .decode_list::<Site>(&response)?
                .into_iter()
                .map(Item::Site)
                .collect(),
        };

        debug!(
            path = self.endpoint.path(),
            page = request.page_number,
            count = items.len(),
            "Fetched page"
        );
        Ok(items)
    }
}

impl std::fmt::Debug for EndpointFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointFetcher")
            .field("endpoint", &self.endpoint)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}
