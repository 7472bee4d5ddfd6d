//! Query and filter state for a pose listing.
//!
//! Holds the current search text, category, sort and the bookmarks-only
//! toggle. Every change recomputes [`QueryParams`] (always back on page 1) and
//! hands them to the registered listener. Bookmarks-only and the client-side
//! sort are applied locally on top of whatever pages were fetched.

use crate::types::{BookmarkSet, DEFAULT_PAGE_SIZE, Pose, QueryParams};

pub mod sort;

pub use sort::{SortField, SortOrder, compare_by, compare_text, sort_poses_by};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Receives freshly computed params after every state change.
pub type QueryListener = Box<dyn FnMut(&QueryParams) + Send>;

pub struct QueryState {
    search: Option<String>,
    category: Option<String>,
    sort: Option<SortField>,
    order: SortOrder,
    bookmarks_only: bool,
    limit: u32,
    listener: Option<QueryListener>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl std::fmt::Debug for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryState")
            .field("search", &self.search)
            .field("category", &self.category)
            .field("sort", &self.sort)
            .field("order", &self.order)
            .field("bookmarks_only", &self.bookmarks_only)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl QueryState {
    pub fn new(limit: u32) -> Self {
        Self {
            search: None,
            category: None,
            sort: None,
            order: SortOrder::Asc,
            bookmarks_only: false,
            limit,
            listener: None,
        }
    }

    /// Register the callback invoked after every change.
    pub fn on_change(&mut self, listener: impl FnMut(&QueryParams) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Params for page 1 under the current state.
    pub fn params(&self) -> QueryParams {
        QueryParams {
            page: 1,
            limit: self.limit,
            search: self.search.clone(),
            category: self.category.clone(),
            sort: self.sort,
            order: self.sort.map(|_| self.order),
        }
    }

    pub fn bookmarks_only(&self) -> bool {
        self.bookmarks_only
    }

    fn changed(&mut self) -> QueryParams {
        let params = self.params();
        if let Some(listener) = self.listener.as_mut() {
            listener(&params);
        }
        params
    }

    /// Blank text clears the search.
    pub fn update_search(&mut self, text: &str) -> QueryParams {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_string());
        self.changed()
    }

    /// Blank or `all` clears the category filter.
    pub fn update_category(&mut self, value: &str) -> QueryParams {
        let value = value.trim();
        self.category = (!value.is_empty() && !value.eq_ignore_ascii_case(ALL_CATEGORIES))
            .then(|| value.to_string());
        self.changed()
    }

    /// `None` means default (server) order.
    pub fn update_sort(&mut self, field: Option<SortField>, order: SortOrder) -> QueryParams {
        self.sort = field;
        self.order = order;
        self.changed()
    }

    pub fn toggle_bookmarks_only(&mut self) -> QueryParams {
        self.bookmarks_only = !self.bookmarks_only;
        self.changed()
    }

    /// Back to defaults on all four axes.
    pub fn reset(&mut self) -> QueryParams {
        self.search = None;
        self.category = None;
        self.sort = None;
        self.order = SortOrder::Asc;
        self.bookmarks_only = false;
        self.changed()
    }

    /// Keep only bookmarked poses when bookmarks-only is on.
    pub fn filter_local_poses(&self, poses: Vec<Pose>, bookmarked: &BookmarkSet) -> Vec<Pose> {
        if !self.bookmarks_only {
            return poses;
        }
        poses
            .into_iter()
            .filter(|pose| bookmarked.contains(&pose.id))
            .collect()
    }

    /// Stable sort by the selected field; untouched in default order.
    pub fn sort_local_poses(&self, mut poses: Vec<Pose>) -> Vec<Pose> {
        if let Some(field) = self.sort {
            sort_poses_by(&mut poses, field, self.order);
        }
        poses
    }

    /// What the listing should show: accumulated pages, filtered then sorted.
    pub fn visible_poses(&self, poses: Vec<Pose>, bookmarked: &BookmarkSet) -> Vec<Pose> {
        self.sort_local_poses(self.filter_local_poses(poses, bookmarked))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    fn pose(id: u64, title: &str, category: &str) -> Pose {
        Pose {
            id,
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            tags: Vec::new(),
            level: String::new(),
            image_url: None,
            video_url: None,
            benefits: String::new(),
            keys: String::new(),
            cautions: String::new(),
            created_at: None,
            updated_at: None,
            published_at: None,
        }
    }

    fn sample() -> Vec<Pose> {
        vec![
            pose(1, "warrior II", "Standing"),
            pose(2, "Bridge", "Backbend"),
            pose(3, "Crow", "Arm Balance"),
            pose(4, "bridge", "backbend"),
        ]
    }

    #[test]
    fn test_updates_notify_listener_with_page_one() {
        let seen: Arc<Mutex<Vec<QueryParams>>> = Arc::default();
        let mut state = QueryState::new(3);
        let sink = seen.clone();
        state.on_change(move |params| sink.lock().push(params.clone()));

        state.update_search("  crow ");
        state.update_category("Arm Balance");
        state.update_sort(Some(SortField::Title), SortOrder::Desc);
        state.toggle_bookmarks_only();

        let seen = seen.lock();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|p| p.page == 1 && p.limit == 3));
        let last = seen.last().unwrap();
        assert_eq!(last.search.as_deref(), Some("crow"));
        assert_eq!(last.category.as_deref(), Some("Arm Balance"));
        assert_eq!(last.sort, Some(SortField::Title));
        assert_eq!(last.order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_blank_inputs_mean_no_constraint() {
        let mut state = QueryState::default();
        assert_eq!(state.update_search("   ").search, None);
        assert_eq!(state.update_category("").category, None);
        assert_eq!(state.update_category("All").category, None);
        let params = state.update_sort(None, SortOrder::Desc);
        assert_eq!(params.sort, None);
        assert_eq!(params.order, None);
    }

    #[test]
    fn test_reset_clears_every_axis() {
        let mut state = QueryState::default();
        state.update_search("tree");
        state.update_category("Balance");
        state.update_sort(Some(SortField::Category), SortOrder::Desc);
        state.toggle_bookmarks_only();

        let params = state.reset();
        assert_eq!(params, QueryParams::default());
        assert!(!state.bookmarks_only());
    }

    #[test]
    fn test_filter_is_identity_unless_bookmarks_only() {
        let mut state = QueryState::default();
        let bookmarked: BookmarkSet = [2, 3].into_iter().collect();

        assert_eq!(state.filter_local_poses(sample(), &bookmarked), sample());

        state.toggle_bookmarks_only();
        let filtered = state.filter_local_poses(sample(), &bookmarked);
        let ids: Vec<_> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_sort_is_a_permutation_and_order_swap_reverses() {
        let mut state = QueryState::default();
        assert_eq!(state.sort_local_poses(sample()), sample());

        state.update_sort(Some(SortField::Title), SortOrder::Asc);
        let asc = state.sort_local_poses(sample());
        let ids: Vec<_> = asc.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);

        state.update_sort(Some(SortField::Title), SortOrder::Desc);
        let mut desc = state.sort_local_poses(sample());
        desc.reverse();
        assert_eq!(asc, desc);

        let mut sorted_ids: Vec<_> = asc.iter().map(|p| p.id).collect();
        sorted_ids.sort();
        assert_eq!(sorted_ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_visible_poses_filters_then_sorts() {
        let mut state = QueryState::default();
        state.toggle_bookmarks_only();
        state.update_sort(Some(SortField::Category), SortOrder::Asc);
        let bookmarked: BookmarkSet = [1, 3].into_iter().collect();

        let visible = state.visible_poses(sample(), &bookmarked);
        let ids: Vec<_> = visible.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
