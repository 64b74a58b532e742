//! HTTP transport module
//!
//! Defines the seam between the data layer and the network.
//!
//! # Overview
//!
//! - `Transport` - what fetchers require: send one request, get status + body
//! - `HttpTransport` - reqwest implementation that authorizes every request
//!
//! Connection pooling, TLS and timeouts are reqwest's concern. Nothing here
//! retries.

mod client;

pub use client::{HttpTransport, OutboundRequest, RawResponse, Transport};
