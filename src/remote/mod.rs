//! Remote catalogue API access.
//!
//! This module provides the HTTP client for the yoga catalogue service along
//! with the capability interface every data source implements.

pub mod client;
pub mod error;
pub mod retry;
pub mod transport;

use std::future::Future;

use crate::error::Result;
use crate::types::{AuthGrant, BookmarkSet, BookmarkStatus, Credentials, PageResult, PoseId, QueryParams};

pub use client::RemoteClient;
pub use error::{ApiError, FailureKind};
pub use retry::RetryPolicy;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// Common interface for catalogue data sources.
///
/// Implemented by the remote client, the local fallback store, and the
/// catalogue service that chooses between them.
pub trait CatalogueBackend: Send + Sync {
    /// Fetch one page of poses matching `params`
    fn fetch_poses(
        &self,
        params: &QueryParams,
    ) -> impl Future<Output = Result<PageResult>> + Send;

    /// Fetch the distinct category labels
    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Register a new account
    fn signup(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthGrant>> + Send;

    /// Sign in to an existing account
    fn login(&self, credentials: &Credentials) -> impl Future<Output = Result<AuthGrant>> + Send;

    /// Resolve the current token to a user id, if it is still valid
    fn check_auth(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Bookmark a pose for the current user
    fn add_bookmark(&self, id: PoseId) -> impl Future<Output = Result<BookmarkStatus>> + Send;

    /// Remove a pose from the current user's bookmarks
    fn remove_bookmark(&self, id: PoseId) -> impl Future<Output = Result<BookmarkStatus>> + Send;

    /// List the current user's bookmarked pose ids
    fn list_bookmarks(&self) -> impl Future<Output = Result<BookmarkSet>> + Send;
}
