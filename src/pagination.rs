//! Pagination controller: accumulates pages of poses for one listing.
//!
//! `has_more` is recomputed after every load from that page alone: a page
//! holding the `limit` that was asked for means there may be another one. While a load is outstanding, further
//! `load_next_page` calls return immediately without touching the backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::Result;
use crate::remote::CatalogueBackend;
use crate::types::{PageResult, Pose, QueryParams};

#[derive(Debug, Default)]
struct PageState {
    params: Option<QueryParams>,
    page: u32,
    poses: Vec<Pose>,
    has_more: bool,
    /// Bumped by every first-page load; next-page results from an older
    /// generation are dropped.
    generation: u64,
}

/// Decrements the in-flight counter when a load finishes, however it ends.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct PaginationController<'a, B> {
    backend: &'a B,
    state: Mutex<PageState>,
    in_flight: AtomicUsize,
}

impl<'a, B: CatalogueBackend> PaginationController<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            state: Mutex::new(PageState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Fetch page 1 for `params` and replace everything accumulated so far.
    pub async fn load_first_page(&self, params: QueryParams) -> Result<PageResult> {
        let params = params.for_page(1);
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.generation
        };

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let page = self.backend.fetch_poses(&params).await?;

        let mut state = self.state.lock();
        if state.generation == generation {
            state.poses = page.items.clone();
            state.has_more = page.fills(params.limit);
            state.page = 1;
            state.params = Some(params);
        }
        Ok(page)
    }

    /// Fetch and append the next page.
    ///
    /// Returns `Ok(None)` without a backend call when a load is already in
    /// flight or the last page was not full.
    pub async fn load_next_page(&self) -> Result<Option<PageResult>> {
        let (params, generation) = {
            let state = self.state.lock();
            match &state.params {
                Some(params) if state.has_more => {
                    (params.for_page(state.page + 1), state.generation)
                }
                _ => return Ok(None),
            }
        };

        if self
            .in_flight
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("page load already in flight, ignoring next-page request");
            return Ok(None);
        }
        let _guard = InFlight(&self.in_flight);

        let page = self.backend.fetch_poses(&params).await?;

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(page = params.page, "dropping page for a superseded query");
            return Ok(None);
        }
        state.poses.extend(page.items.iter().cloned());
        state.has_more = page.fills(params.limit);
        state.page = params.page;
        Ok(Some(page))
    }

    /// Everything loaded so far, in load order.
    pub fn poses(&self) -> Vec<Pose> {
        self.state.lock().poses.clone()
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().has_more
    }

    /// Number of the last page merged, 0 before the first load.
    pub fn current_page(&self) -> u32 {
        self.state.lock().page
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
