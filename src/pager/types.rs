//! Pagination types
//!
//! Pages, load results, loader state and the refresh-key computation.

use crate::error::Error;
use crate::types::PageKey;
use serde::Serialize;
use std::sync::Arc;

/// One loaded page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Page number this page was loaded for
    pub page_number: u32,
    /// Items in server order
    pub items: Vec<T>,
    /// Previous page, `None` on page 1
    pub prev_key: PageKey,
    /// Next page, `None` once a page comes back empty or short
    pub next_key: PageKey,
}

impl<T> Page<T> {
    /// Build a page and derive its navigation keys
    pub fn from_items(page_number: u32, page_size: u32, items: Vec<T>) -> Self {
        let prev_key = if page_number > 1 {
            Some(page_number - 1)
        } else {
            None
        };
        // The last addressable page number has no successor
        let next_key = if items.is_empty() || items.len() < page_size as usize {
            None
        } else {
            page_number.checked_add(1)
        };
        Self {
            page_number,
            items,
            prev_key,
            next_key,
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether this page exhausted the listing
    pub fn is_last(&self) -> bool {
        self.next_key.is_none()
    }
}

/// Outcome of one `load` call
#[derive(Debug, Clone)]
pub enum LoadResult<T> {
    /// The page loaded
    Page(Page<T>),
    /// The load failed; retry at the same page number
    Error { page_number: u32, error: Arc<Error> },
    /// The session was invalidated while this load was in flight
    Invalid,
}

impl<T> LoadResult<T> {
    /// The page, if loaded
    pub fn page(&self) -> Option<&Page<T>> {
        match self {
            Self::Page(page) => Some(page),
            _ => None,
        }
    }

    /// The error, if failed
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }

    /// Whether the result was dropped as stale
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }
}

/// Per-session loader state
#[derive(Debug, Clone)]
pub enum LoaderState<T> {
    Idle,
    Loading {
        page_number: u32,
    },
    Loaded(Page<T>),
    Failed {
        page_number: u32,
        error: Arc<Error>,
    },
}

impl<T> LoaderState<T> {
    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Page number of the current or last load
    pub fn page_number(&self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Loading { page_number } | Self::Failed { page_number, .. } => Some(*page_number),
            Self::Loaded(page) => Some(page.page_number),
        }
    }
}

/// Loaded pages of a session plus the consumer's anchor position
#[derive(Debug, Clone)]
pub struct PagingState<T> {
    /// Pages ordered by page number
    pub pages: Vec<Page<T>>,
    /// Index into the flattened item list the consumer last looked at
    pub anchor_position: Option<usize>,
}

impl<T> Default for PagingState<T> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            anchor_position: None,
        }
    }
}

impl<T> PagingState<T> {
    /// Create a state from pages and an anchor
    pub fn new(pages: Vec<Page<T>>, anchor_position: Option<usize>) -> Self {
        Self {
            pages,
            anchor_position,
        }
    }

    /// Total items across loaded pages
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Record a page, keeping pages ordered and replacing a reload
    pub fn insert_page(&mut self, page: Page<T>) {
        match self
            .pages
            .binary_search_by_key(&page.page_number, |p| p.page_number)
        {
            Ok(index) => self.pages[index] = page,
            Err(index) => self.pages.insert(index, page),
        }
    }

    /// Page containing the flattened item at `position`
    ///
    /// Positions past the end resolve to the last page. `None` when no page
    /// holds any item.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page<T>> {
        if self.pages.iter().all(Page::is_empty) {
            return None;
        }

        let mut remaining = position;
        for page in &self.pages {
            if remaining < page.len() {
                return Some(page);
            }
            remaining -= page.len();
        }
        self.pages.last()
    }
}

/// Page to reload after an invalidation
///
/// Takes the page closest to the anchor and prefers `prev_key + 1`, then
/// `next_key - 1`. `None` means start over at page 1.
pub fn refresh_key<T>(state: &PagingState<T>) -> PageKey {
    let anchor = state.anchor_position?;
    let page = state.closest_page_to_position(anchor)?;
    page.prev_key
        .and_then(|key| key.checked_add(1))
        .or_else(|| page.next_key.and_then(|key| key.checked_sub(1)))
}
