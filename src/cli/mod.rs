//! CLI module
//!
//! Command-line interface over the data client.
//!
//! # Commands
//!
//! - `kinds` - List resource kinds and their endpoints
//! - `page` - Fetch a single page
//! - `crawl` - Walk every page of a listing

mod commands;
mod runner;

pub use commands::{Cli, Commands, ListingArgs, OutputFormat};
pub use runner::Runner;
