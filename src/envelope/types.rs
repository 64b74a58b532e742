//! Envelope wire types

use serde::{Deserialize, Serialize};

/// Envelope code that means success unless configured otherwise
pub const DEFAULT_SUCCESS_CODE: i64 = 200;

/// Uniform server response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Server-defined status code
    pub code: i64,
    /// Payload, absent or null on failure and on empty results
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

/// List payload of a paged endpoint
///
/// Some endpoints return the page's items directly, others wrap them in a
/// page object with a total count.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// `data: [...]`
    Bare(Vec<T>),
    /// `data: {records: [...], total: n}`
    Paged(PagedList<T>),
}

/// Page object form of a list payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PagedList<T> {
    /// Items of this page, in server order
    #[serde(alias = "list", alias = "rows")]
    pub records: Vec<T>,
    /// Total item count across all pages, when reported
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> ListPayload<T> {
    /// Items in server order
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Paged(page) => page.records,
        }
    }

    /// Total count, if the server reported one
    pub fn total(&self) -> Option<u64> {
        match self {
            Self::Bare(_) => None,
            Self::Paged(page) => page.total,
        }
    }
}
