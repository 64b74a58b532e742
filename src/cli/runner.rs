//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ListingArgs, OutputFormat};
use crate::client::DataClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::pager::{LoadResult, Page};
use crate::resource::{EndpointTable, Item, ResourceKind};
use futures::StreamExt;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};

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
        match &self.cli.command {
            Commands::Kinds => self.kinds(),
            Commands::Page { listing, page } => self.page(listing, *page).await,
            Commands::Crawl { listing, max_pages } => self.crawl(listing, *max_pages).await,
        }
    }

    /// Load the client configuration from `--config` or `--base-url`
    fn load_config(&self) -> Result<ClientConfig> {
        let config = match (&self.cli.config, &self.cli.base_url) {
            (Some(path), _) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            (None, Some(base_url)) => ClientConfig::new(base_url.clone()),
            (None, None) => {
                return Err(Error::config(
                    "No configuration given (use --config or --base-url)",
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Build the data client and seed the token store
    fn build_client(&self) -> Result<DataClient> {
        let client = DataClient::new(self.load_config()?)?;
        match &self.cli.token {
            Some(token) if !token.is_empty() => client.set_credential(token.clone()),
            _ => debug!("No token given, requests go out with an empty bearer"),
        }
        Ok(client)
    }

    /// List kinds with their call shape and path
    fn kinds(&self) -> Result<()> {
        let table = match (&self.cli.config, &self.cli.base_url) {
            (None, None) => EndpointTable::default(),
            _ => EndpointTable::from_config(&self.load_config()?),
        };

        for kind in ResourceKind::ALL {
            let message = match table.get(kind) {
                Some(endpoint) => json!({
                    "kind": kind.as_str(),
                    "shape": endpoint.shape_name(),
                    "path": endpoint.path(),
                }),
                None => json!({ "kind": kind.as_str(), "shape": null, "path": null }),
            };
            self.output_message(&message);
        }
        Ok(())
    }

    /// Fetch one page
    async fn page(&self, listing: &ListingArgs, page_number: u32) -> Result<()> {
        let client = self.build_client()?;
        let page = client
            .request_page_named(
                &listing.kind,
                page_number,
                listing.page_size,
                listing.query(),
            )
            .await?;
        self.output_page(&listing.kind, &page);
        Ok(())
    }

    /// Walk a session from page 1, stopping after `max_pages` pages when given
    async fn crawl(&self, listing: &ListingArgs, max_pages: Option<u64>) -> Result<()> {
        let client = self.build_client()?;
        let kind = listing.resource_kind()?;
        let session = client.open_session(kind, listing.query(), listing.page_size)?;
        let start = Instant::now();

        let mut pages = Box::pin(session.pages());
        let mut page_count = 0u64;
        let mut item_count = 0usize;

        while let Some(result) = pages.next().await {
            match result {
                LoadResult::Page(page) => {
                    page_count += 1;
                    item_count += page.len();
                    self.output_page(kind.as_str(), &page);
                }
                LoadResult::Error { page_number, error } => {
                    self.output_message(&json!({
                        "type": "ERROR",
                        "error": {
                            "page_number": page_number,
                            "code": error.domain_code(),
                            "message": error.to_string(),
                        }
                    }));
                    return Err(Error::Other(format!(
                        "Crawl stopped at page {page_number}: {error}"
                    )));
                }
                LoadResult::Invalid => break,
            }

            if max_pages.is_some_and(|max| page_count >= max) {
                debug!(page_count, "Reached --max-pages");
                break;
            }
        }

        info!(
            kind = %kind,
            pages = page_count,
            items = item_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Crawl finished"
        );
        Ok(())
    }

    /// Output one page message
    fn output_page(&self, kind: &str, page: &Page<Item>) {
        self.output_message(&json!({
            "type": "PAGE",
            "page": {
                "kind": kind,
                "page_number": page.page_number,
                "prev_key": page.prev_key,
                "next_key": page.next_key,
                "items": page.items,
            }
        }));
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
