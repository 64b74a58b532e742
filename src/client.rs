//! Consumer facade
//!
//! `DataClient` wires the layers together once at startup:
//!
//! ```text
//! ClientConfig ─► TokenStore ─► RequestAuthorizer ─► HttpTransport
//!                                                        │
//!                          Dispatcher ◄─ EndpointFetcher ◄┘ (EnvelopeDecoder)
//! ```
//!
//! Screens ask it for single pages or open a `PagingSession` per listing.

use crate::auth::{Credential, RequestAuthorizer, TokenStore};
use crate::config::ClientConfig;
use crate::envelope::EnvelopeDecoder;
use crate::error::Result;
use crate::http::{HttpTransport, Transport};
use crate::pager::{Page, PageSource, PagingSession};
use crate::resource::{Dispatcher, EndpointTable, Item, PageQuery, PageRequest, ResourceKind};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for listing resources
#[derive(Clone)]
pub struct DataClient {
    config: ClientConfig,
    tokens: TokenStore,
    dispatcher: Arc<Dispatcher>,
}

impl DataClient {
    /// Build the full stack from a validated config
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_token_store(config, TokenStore::new())
    }

    /// Build the stack around a token store owned by the host application
    pub fn with_token_store(config: ClientConfig, tokens: TokenStore) -> Result<Self> {
        config.validate()?;

        let authorizer = RequestAuthorizer::new(tokens.clone(), config.authorizer_config())?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config, authorizer)?);
        let decoder = EnvelopeDecoder::new(config.success_code);
        let endpoints = EndpointTable::from_config(&config);
        let dispatcher = Dispatcher::standard(transport, decoder, &endpoints);

        info!(
            base_url = %config.base_url,
            kinds = dispatcher.kinds().len(),
            "Data client ready"
        );

        Ok(Self {
            config,
            tokens,
            dispatcher: Arc::new(dispatcher),
        })
    }

    /// Build a client over a caller-supplied dispatcher
    pub fn from_parts(config: ClientConfig, tokens: TokenStore, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            tokens,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared token store
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// The kind to fetcher table
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Credential currently attached to requests, if any
    pub fn current_credential(&self) -> Option<Credential> {
        self.tokens.get()
    }

    /// Replace the credential; later requests carry the new token
    pub fn set_credential(&self, token: impl Into<String>) {
        self.tokens.set(token);
    }

    /// Drop the credential, e.g. on logout
    pub fn clear_credential(&self) {
        self.tokens.clear();
    }

    /// Fetch one page of a kind outside any session
    ///
    /// `page_size` falls back to the configured default.
    pub async fn request_page(
        &self,
        kind: ResourceKind,
        page_number: u32,
        page_size: Option<u32>,
        query: PageQuery,
    ) -> Result<Page<Item>> {
        let page_size = page_size.unwrap_or(self.config.default_page_size);
        let request = PageRequest::new(page_number, page_size, query)?;
        debug!(%kind, page_number, page_size, "Requesting page");

        let items = self.dispatcher.dispatch(kind, &request).await?;
        Ok(Page::from_items(page_number, page_size, items))
    }

    /// `request_page` for a kind given by name; unknown names give an empty page
    pub async fn request_page_named(
        &self,
        kind: &str,
        page_number: u32,
        page_size: Option<u32>,
        query: PageQuery,
    ) -> Result<Page<Item>> {
        let page_size = page_size.unwrap_or(self.config.default_page_size);
        let request = PageRequest::new(page_number, page_size, query)?;

        let items = self.dispatcher.dispatch_named(kind, &request).await?;
        Ok(Page::from_items(page_number, page_size, items))
    }

    /// Open a session over one kind and one fixed query
    pub fn open_session(
        &self,
        kind: ResourceKind,
        query: PageQuery,
        page_size: Option<u32>,
    ) -> Result<PagingSession<KindSource>> {
        let page_size = page_size.unwrap_or(self.config.default_page_size);
        debug!(%kind, page_size, "Opening paging session");
        PagingSession::new(
            KindSource::new(Arc::clone(&self.dispatcher), kind, query),
            page_size,
        )
    }

    /// Invalidate a session, e.g. after pull-to-refresh or a credential change
    pub fn invalidate(&self, session: &PagingSession<KindSource>) -> u64 {
        session.invalidate()
    }
}

impl std::fmt::Debug for DataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataClient")
            .field("base_url", &self.config.base_url)
            .field("tokens", &self.tokens)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// Page source for one kind with a fixed query
#[derive(Debug, Clone)]
pub struct KindSource {
    dispatcher: Arc<Dispatcher>,
    kind: ResourceKind,
    query: PageQuery,
}

impl KindSource {
    /// Create a source over a shared dispatcher
    pub fn new(dispatcher: Arc<Dispatcher>, kind: ResourceKind, query: PageQuery) -> Self {
        Self {
            dispatcher,
            kind,
            query,
        }
    }

    /// Kind every page is loaded for
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The fixed query of this source
    pub fn query(&self) -> &PageQuery {
        &self.query
    }
}

#[async_trait]
impl PageSource for KindSource {
    type Item = Item;

    async fn load_page(&self, page_number: u32, page_size: u32) -> Result<Vec<Item>> {
        let request = PageRequest::new(page_number, page_size, self.query.clone())?;
        self.dispatcher.dispatch(self.kind, &request).await
    }
}
