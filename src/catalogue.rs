//! Catalogue service: one interface over the remote API and the local store.
//!
//! Every call goes to the remote client until the first failure. That failure
//! demotes the service to local mode for the rest of the session: the failing
//! call is re-issued against the local store and no later call reaches the
//! remote client again.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;
use crate::error::{CatalogueError, Result};
use crate::local::LocalStore;
use crate::remote::{CatalogueBackend, RemoteClient};
use crate::session::SessionStore;
use crate::types::{
    AuthGrant, BookmarkSet, BookmarkStatus, Credentials, PageResult, PoseId, QueryParams,
};
use crate::utils::validation::validate_credentials;

pub struct CatalogueService<R = RemoteClient, L = LocalStore> {
    remote: R,
    local: L,
    use_local: AtomicBool,
}

impl CatalogueService<RemoteClient, LocalStore> {
    /// Wire the production remote client and the bundled local store.
    pub fn from_config(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let remote = RemoteClient::from_config(config, session.clone())?;
        let local = LocalStore::bundled(session);
        let service = Self::new(remote, local);
        if config.offline {
            service.force_local();
        }
        Ok(service)
    }
}

impl<R: CatalogueBackend, L: CatalogueBackend> CatalogueService<R, L> {
    pub fn new(remote: R, local: L) -> Self {
        Self {
            remote,
            local,
            use_local: AtomicBool::new(false),
        }
    }

    /// Whether the session has been demoted to the local store.
    pub fn is_local(&self) -> bool {
        self.use_local.load(Ordering::SeqCst)
    }

    /// Start (or continue) the session in local mode.
    pub fn force_local(&self) {
        self.use_local.store(true, Ordering::SeqCst);
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    fn demote(&self, operation: &str, error: &CatalogueError) {
        if !self.use_local.swap(true, Ordering::SeqCst) {
            tracing::warn!(
                operation,
                "remote catalogue unavailable, switching to local data for this session: {error}"
            );
        }
    }

    /// Run `remote` unless already demoted; on failure demote and run `local`.
    ///
    /// Both futures are lazy, so the one not chosen never does any work.
    async fn with_fallback<T>(
        &self,
        operation: &str,
        remote: impl Future<Output = Result<T>>,
        local: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        if !self.is_local() {
            match remote.await {
                Ok(value) => return Ok(value),
                Err(error) => self.demote(operation, &error),
            }
        }
        local.await
    }
}

impl<R: CatalogueBackend, L: CatalogueBackend> CatalogueBackend for CatalogueService<R, L> {
    async fn fetch_poses(&self, params: &QueryParams) -> Result<PageResult> {
        let result = self
            .with_fallback(
                "fetch_poses",
                self.remote.fetch_poses(params),
                self.local.fetch_poses(params),
            )
            .await;
        Ok(result.unwrap_or_else(|error| {
            tracing::warn!("local pose query failed, returning no results: {error}");
            PageResult::empty(params)
        }))
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        let result = self
            .with_fallback(
                "fetch_categories",
                self.remote.fetch_categories(),
                self.local.fetch_categories(),
            )
            .await;
        Ok(result.unwrap_or_else(|error| {
            tracing::warn!("local category query failed, returning none: {error}");
            Vec::new()
        }))
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthGrant> {
        validate_credentials(credentials)?;
        self.with_fallback(
            "signup",
            self.remote.signup(credentials),
            self.local.signup(credentials),
        )
        .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        validate_credentials(credentials)?;
        self.with_fallback(
            "login",
            self.remote.login(credentials),
            self.local.login(credentials),
        )
        .await
    }

    async fn check_auth(&self) -> Result<Option<String>> {
        self.with_fallback("check_auth", self.remote.check_auth(), self.local.check_auth())
            .await
    }

    async fn add_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        self.with_fallback(
            "add_bookmark",
            self.remote.add_bookmark(id),
            self.local.add_bookmark(id),
        )
        .await
    }

    async fn remove_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        self.with_fallback(
            "remove_bookmark",
            self.remote.remove_bookmark(id),
            self.local.remove_bookmark(id),
        )
        .await
    }

    async fn list_bookmarks(&self) -> Result<BookmarkSet> {
        self.with_fallback(
            "list_bookmarks",
            self.remote.list_bookmarks(),
            self.local.list_bookmarks(),
        )
        .await
    }
}
