//! Paging session
//!
//! One listing over one fixed query. Loads are serialized per session and
//! tagged with the generation they were issued under; a result whose
//! generation is no longer current is dropped without touching state.

use super::types::{refresh_key, LoadResult, LoaderState, Page, PagingState};
use crate::error::{Error, Result};
use crate::types::PageKey;
use async_trait::async_trait;
use futures::stream::{self, Stream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as LoadLock;
use tracing::{debug, warn};

/// Capability to load one page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type of the listing
    type Item: Clone + Send + Sync + 'static;

    /// Load the items of `page_number` (1-based)
    async fn load_page(&self, page_number: u32, page_size: u32) -> Result<Vec<Self::Item>>;
}

#[derive(Debug)]
struct SessionState<T> {
    loader: LoaderState<T>,
    paging: PagingState<T>,
    stale: bool,
}

/// One pagination session
pub struct PagingSession<S: PageSource> {
    source: S,
    page_size: u32,
    generation: AtomicU64,
    load_lock: LoadLock<()>,
    state: Mutex<SessionState<S::Item>>,
}

impl<S: PageSource> PagingSession<S> {
    /// Create a session; `page_size` must be at least 1
    pub fn new(source: S, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::invalid_page("page size must be at least 1"));
        }
        Ok(Self {
            source,
            page_size,
            generation: AtomicU64::new(0),
            load_lock: LoadLock::new(()),
            state: Mutex::new(SessionState {
                loader: LoaderState::Idle,
                paging: PagingState::default(),
                stale: false,
            }),
        })
    }

    /// Page size of every load in this session
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether the session was invalidated and not yet refreshed
    pub fn is_stale(&self) -> bool {
        self.lock_state().stale
    }

    /// Snapshot of the loader state
    pub fn state(&self) -> LoaderState<S::Item> {
        self.lock_state().loader.clone()
    }

    /// Snapshot of loaded pages and anchor
    pub fn paging_state(&self) -> PagingState<S::Item> {
        self.lock_state().paging.clone()
    }

    /// Record the item position the consumer is looking at
    pub fn set_anchor(&self, position: usize) {
        self.lock_state().paging.anchor_position = Some(position);
    }

    /// Page to resume from after an invalidation, if any
    pub fn refresh_key(&self) -> PageKey {
        refresh_key(&self.lock_state().paging)
    }

    /// Load a page; `None` loads page 1
    ///
    /// Concurrent calls are queued. A failed load leaves every key where it
    /// was so the same page number can be retried.
    pub async fn load(&self, requested_key: PageKey) -> LoadResult<S::Item> {
        let issued = self.generation();
        let _permit = self.load_lock.lock().await;

        let page_number = requested_key.unwrap_or(1).max(1);
        {
            let mut state = self.lock_state();
            if self.generation() != issued {
                debug!(page_number, "Load superseded before it started");
                return LoadResult::Invalid;
            }
            state.loader = LoaderState::Loading { page_number };
        }

        debug!(page_number, page_size = self.page_size, "Loading page");
        let result = self.source.load_page(page_number, self.page_size).await;

        let mut state = self.lock_state();
        if self.generation() != issued {
            warn!(page_number, "Dropping result of a superseded load");
            return LoadResult::Invalid;
        }

        match result {
            Ok(items) => {
                let page = Page::from_items(page_number, self.page_size, items);
                state.paging.insert_page(page.clone());
                state.loader = LoaderState::Loaded(page.clone());
                LoadResult::Page(page)
            }
            Err(e) => {
                debug!(page_number, error = %e, "Page load failed");
                let error = Arc::new(e);
                state.loader = LoaderState::Failed {
                    page_number,
                    error: Arc::clone(&error),
                };
                LoadResult::Error { page_number, error }
            }
        }
    }

    /// Abandon in-flight loads
    ///
    /// Loaded pages and the anchor are kept so `refresh` can resume near
    /// the anchor. Returns the new generation.
    pub fn invalidate(&self) -> u64 {
        let mut state = self.lock_state();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.stale = true;
        state.loader = LoaderState::Idle;
        debug!(generation, "Session invalidated");
        generation
    }

    /// Reload from the refresh key (page 1 when there is none)
    pub async fn refresh(&self) -> LoadResult<S::Item> {
        let key = {
            let mut state = self.lock_state();
            let key = refresh_key(&state.paging).unwrap_or(1);
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.paging.pages.clear();
            state.loader = LoaderState::Idle;
            state.stale = false;
            key
        };
        debug!(page_number = key, "Refreshing session");
        self.load(Some(key)).await
    }

    /// Walk the listing from page 1
    ///
    /// Ends after the last page, the first error, or an invalidation.
    pub fn pages(&self) -> impl Stream<Item = LoadResult<S::Item>> + '_ {
        stream::unfold(Some(1u32), move |next| async move {
            let key = next?;
            let result = self.load(Some(key)).await;
            let following = match &result {
                LoadResult::Page(page) => page.next_key,
                LoadResult::Error { .. } | LoadResult::Invalid => None,
            };
            Some((result, following))
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState<S::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: PageSource> std::fmt::Debug for PagingSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingSession")
            .field("page_size", &self.page_size)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
