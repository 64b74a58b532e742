//! CLI commands and argument parsing

use crate::resource::{PageQuery, ResourceKind};
use crate::types::LogLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paginated device and site listings from the command line
#[derive(Parser, Debug)]
#[command(name = "devpage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL, used when no config file is given
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token
    #[arg(short, long, global = true, env = "DEVPAGE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List resource kinds and their endpoints
    Kinds,

    /// Fetch a single page
    Page {
        #[command(flatten)]
        listing: ListingArgs,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Walk every page of a listing
    Crawl {
        #[command(flatten)]
        listing: ListingArgs,

        /// Stop after this many pages (at least 1)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_pages: Option<u64>,
    },
}

/// Kind, paging and filter arguments shared by `page` and `crawl`
#[derive(Args, Debug, Clone)]
pub struct ListingArgs {
    /// Resource kind (e.g. lamp, camera, site)
    #[arg(short, long)]
    pub kind: String,

    /// Page size (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Search keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Road filter
    #[arg(long)]
    pub road_id: Option<String>,

    /// Site filter
    #[arg(long)]
    pub site_id: Option<String>,

    /// Only online (true) or offline (false) devices
    #[arg(long)]
    pub online: Option<bool>,
}

impl ListingArgs {
    /// Parse the kind name
    pub fn resource_kind(&self) -> crate::Result<ResourceKind> {
        self.kind.parse()
    }

    /// Query built from the filter flags
    pub fn query(&self) -> PageQuery {
        let mut query = PageQuery::new();
        if let Some(keyword) = &self.keyword {
            query = query.keyword(keyword.clone());
        }
        if let Some(road_id) = &self.road_id {
            query = query.road_id(road_id.clone());
        }
        if let Some(site_id) = &self.site_id {
            query = query.site_id(site_id.clone());
        }
        if let Some(online) = self.online {
            query = query.online(online);
        }
        query
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one page per line)
    Json,
    /// Human-readable output
    Pretty,
}
