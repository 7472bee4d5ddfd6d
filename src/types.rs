//! Core data types shared by every data source.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogueError, Result};
use crate::query::sort::{SortField, SortOrder};

/// Stable, immutable identifier of a pose.
pub type PoseId = u64;

/// Default page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Durable storage key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Durable storage key holding the JSON-encoded local bookmark list.
pub const LOCAL_BOOKMARKS_KEY: &str = "local_bookmarks";

/// A catalogue entry in its canonical shape.
///
/// Every data source normalizes into this type before a pose leaves the
/// catalogue service, see [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub id: PoseId,
    pub title: String,
    pub description: String,
    /// Free-text label, not an enum. Drives the category filter options.
    pub category: String,
    pub tags: Vec<String>,
    pub level: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub benefits: String,
    pub keys: String,
    pub cautions: String,
    /// Opaque timestamps, passed through unparsed.
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub published_at: Option<String>,
}

impl Pose {
    /// Fields covered by free-text search, in the order they are checked.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.title.as_str(),
            self.level.as_str(),
            self.benefits.as_str(),
            self.keys.as_str(),
            self.category.as_str(),
        ]
        .into_iter()
        .chain(self.tags.iter().map(String::as_str))
    }

    /// Case-insensitive substring match against any searchable field.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.searchable_fields()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Request descriptor for a page of poses.
///
/// A `None` field means "no constraint on that axis", never "match the empty
/// string".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            category: None,
            sort: None,
            order: None,
        }
    }
}

impl QueryParams {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Same constraints, different page.
    pub fn for_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Serialize into URL query pairs. Absent fields are omitted.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_string(), sort.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.to_string()));
        }
        pairs
    }
}

/// Pagination metadata reported alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Response envelope for a page of poses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PageResult {
    pub items: Vec<Pose>,
    pub pagination: Pagination,
}

impl PageResult {
    /// Safe empty result returned when nothing could be fetched.
    pub fn empty(params: &QueryParams) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination {
                page: params.page,
                limit: params.limit,
                total: 0,
            },
        }
    }

    /// A page holding exactly the requested `limit` is the only signal that
    /// more pages may exist. The limit a server echoes back is not trusted.
    pub fn fills(&self, limit: u32) -> bool {
        limit > 0 && self.items.len() == limit as usize
    }
}

/// Username/password pair sent to signup and login.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful signup or login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub user_id: String,
    pub token: String,
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of a bookmark mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkStatus {
    NewlyBookmarked,
    AlreadyBookmarked,
    NewlyDeleted,
    AlreadyDeleted,
}

impl BookmarkStatus {
    pub fn message(&self) -> &'static str {
        match self {
            BookmarkStatus::NewlyBookmarked => "newly bookmarked",
            BookmarkStatus::AlreadyBookmarked => "already bookmarked",
            BookmarkStatus::NewlyDeleted => "newly deleted",
            BookmarkStatus::AlreadyDeleted => "already deleted",
        }
    }
}

impl fmt::Display for BookmarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl FromStr for BookmarkStatus {
    type Err = CatalogueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "newly bookmarked" => Ok(BookmarkStatus::NewlyBookmarked),
            "already bookmarked" => Ok(BookmarkStatus::AlreadyBookmarked),
            "newly deleted" => Ok(BookmarkStatus::NewlyDeleted),
            "already deleted" => Ok(BookmarkStatus::AlreadyDeleted),
            _ => Err(CatalogueError::Api(format!(
                "unexpected bookmark status message '{s}'"
            ))),
        }
    }
}

/// Set of bookmarked pose ids, ordered for stable output.
pub type BookmarkSet = BTreeSet<PoseId>;

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(id: PoseId, title: &str) -> Pose {
        Pose {
            id,
            title: title.to_string(),
            description: String::new(),
            category: "Standing".to_string(),
            tags: vec!["Balance".to_string()],
            level: "Beginner".to_string(),
            image_url: None,
            video_url: None,
            benefits: "Strengthens legs".to_string(),
            keys: String::new(),
            cautions: String::new(),
            created_at: None,
            updated_at: None,
            published_at: None,
        }
    }

    #[test]
    fn test_matches_term_any_field() {
        let p = pose(1, "Tree Pose");
        assert!(p.matches_term("tree"));
        assert!(p.matches_term("LEGS"));
        assert!(p.matches_term("balance"));
        assert!(p.matches_term("standing"));
        assert!(!p.matches_term("inversion"));
    }

    #[test]
    fn test_query_pairs_omit_absent_fields() {
        let params = QueryParams::default();
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "3".to_string())
            ]
        );

        let params = QueryParams {
            search: Some("warrior".to_string()),
            sort: Some(SortField::Title),
            order: Some(SortOrder::Desc),
            ..QueryParams::with_limit(10)
        };
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("search".to_string(), "warrior".to_string())));
        assert!(pairs.contains(&("sort".to_string(), "title".to_string())));
        assert!(pairs.contains(&("order".to_string(), "desc".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "category"));
    }

    #[test]
    fn test_page_result_fills_requested_limit() {
        let params = QueryParams::default();
        let mut result = PageResult::empty(&params);
        assert!(!result.fills(3));
        result.items = vec![pose(1, "a"), pose(2, "b"), pose(3, "c")];
        assert!(result.fills(3));
        assert!(!result.fills(0));

        result.pagination.limit = 10;
        assert!(result.fills(3));
        assert!(!result.fills(10));
    }

    #[test]
    fn test_bookmark_status_parse() {
        assert_eq!(
            "newly bookmarked".parse::<BookmarkStatus>().unwrap(),
            BookmarkStatus::NewlyBookmarked
        );
        assert_eq!(
            "Already Deleted".parse::<BookmarkStatus>().unwrap(),
            BookmarkStatus::AlreadyDeleted
        );
        assert!("maybe".parse::<BookmarkStatus>().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter22");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter22"));
    }
}
