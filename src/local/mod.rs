//! Local fallback store.
//!
//! Serves the same query surface as the remote API from a bundled dataset. It
//! never fails with a network error and is the terminal fallback of the
//! catalogue service.

use std::borrow::Cow;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{CatalogueError, Result};
use crate::normalize::{RawPose, normalize_all};
use crate::query::sort::sort_poses_by;
use crate::remote::CatalogueBackend;
use crate::session::SessionStore;
use crate::types::{
    AuthGrant, BookmarkSet, BookmarkStatus, Credentials, PageResult, Pagination, Pose, PoseId,
    QueryParams,
};

/// Dataset compiled into the binary.
pub const BUNDLED_DATASET: &str = include_str!("../../data/poses.json");

const MOCK_TOKEN_PREFIX: &str = "local-token-";
const MOCK_USER_PREFIX: &str = "local-user-";

pub struct LocalStore {
    source: Cow<'static, str>,
    poses: OnceCell<Vec<Pose>>,
    session: Arc<SessionStore>,
}

impl LocalStore {
    /// Store backed by the bundled dataset, parsed on first use.
    pub fn bundled(session: Arc<SessionStore>) -> Self {
        Self {
            source: Cow::Borrowed(BUNDLED_DATASET),
            poses: OnceCell::new(),
            session,
        }
    }

    /// Store backed by a JSON array of pose records, parsed on first use.
    pub fn from_json(json: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self {
            source: Cow::Owned(json.into()),
            poses: OnceCell::new(),
            session,
        }
    }

    /// Store over already-normalized poses.
    pub fn from_poses(poses: Vec<Pose>, session: Arc<SessionStore>) -> Self {
        Self {
            source: Cow::Borrowed(""),
            poses: OnceCell::with_value(poses),
            session,
        }
    }

    fn poses(&self) -> Result<&[Pose]> {
        self.poses
            .get_or_try_init(|| {
                let raw: Vec<RawPose> = serde_json::from_str(&self.source)
                    .map_err(|e| CatalogueError::Dataset(format!("invalid pose dataset: {e}")))?;
                let poses = normalize_all(raw)?;
                tracing::debug!(count = poses.len(), "loaded local pose dataset");
                Ok(poses)
            })
            .map(Vec::as_slice)
    }

    /// Search, category filter, sort and slice, in that order.
    pub fn query(&self, params: &QueryParams) -> Result<PageResult> {
        let mut matching: Vec<Pose> = self
            .poses()?
            .iter()
            .filter(|pose| match params.search.as_deref().map(str::trim) {
                Some(term) if !term.is_empty() => pose.matches_term(term),
                _ => true,
            })
            .filter(|pose| match params.category.as_deref() {
                Some(category) => pose.category == category,
                None => true,
            })
            .cloned()
            .collect();

        if let Some(field) = params.sort {
            sort_poses_by(&mut matching, field, params.order.unwrap_or_default());
        }

        let total = matching.len() as u64;
        let limit = params.limit as usize;
        let start = (params.page.max(1) as usize - 1).saturating_mul(limit);
        let items: Vec<Pose> = matching.into_iter().skip(start).take(limit).collect();

        Ok(PageResult {
            items,
            pagination: Pagination {
                page: params.page.max(1),
                limit: params.limit,
                total,
            },
        })
    }

    /// Distinct category labels, first-seen order.
    pub fn categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<String> = Vec::new();
        for pose in self.poses()? {
            if !pose.category.is_empty() && !categories.contains(&pose.category) {
                categories.push(pose.category.clone());
            }
        }
        Ok(categories)
    }

    fn mock_grant(&self) -> AuthGrant {
        let stamp = jiff::Timestamp::now().as_millisecond();
        AuthGrant {
            user_id: format!("{MOCK_USER_PREFIX}{stamp}"),
            token: format!("{MOCK_TOKEN_PREFIX}{stamp}"),
        }
    }
}

impl CatalogueBackend for LocalStore {
    async fn fetch_poses(&self, params: &QueryParams) -> Result<PageResult> {
        self.query(params)
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        self.categories()
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthGrant> {
        tracing::info!(username = %credentials.username, "local mode: issuing mock signup");
        Ok(self.mock_grant())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        tracing::info!(username = %credentials.username, "local mode: issuing mock login");
        Ok(self.mock_grant())
    }

    async fn check_auth(&self) -> Result<Option<String>> {
        let Some(token) = self.session.token() else {
            return Ok(None);
        };
        if let Some(user_id) = self.session.user_id() {
            return Ok(Some(user_id));
        }
        let user_id = match token.strip_prefix(MOCK_TOKEN_PREFIX) {
            Some(stamp) => format!("{MOCK_USER_PREFIX}{stamp}"),
            None => format!("{MOCK_USER_PREFIX}offline"),
        };
        Ok(Some(user_id))
    }

    async fn add_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        let mut ids = self.session.get_local_bookmarks();
        if ids.contains(&id) {
            return Ok(BookmarkStatus::AlreadyBookmarked);
        }
        ids.push(id);
        self.session.set_local_bookmarks(&ids)?;
        Ok(BookmarkStatus::NewlyBookmarked)
    }

    async fn remove_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        let mut ids = self.session.get_local_bookmarks();
        let before = ids.len();
        ids.retain(|existing| *existing != id);
        if ids.len() == before {
            return Ok(BookmarkStatus::AlreadyDeleted);
        }
        self.session.set_local_bookmarks(&ids)?;
        Ok(BookmarkStatus::NewlyDeleted)
    }

    async fn list_bookmarks(&self) -> Result<BookmarkSet> {
        Ok(self.session.get_local_bookmarks().into_iter().collect())
    }
}
