//! Sign-in flow on top of a catalogue backend.
//!
//! Handles credential validation, token persistence, the bookmark refresh that
//! follows a successful sign-in, and the auth event channel listeners use to
//! react to sign-in and sign-out.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::{CatalogueError, Result};
use crate::remote::CatalogueBackend;
use crate::session::SessionStore;
use crate::types::{AuthGrant, BookmarkSet, BookmarkStatus, Credentials, PoseId};
use crate::utils::validation::validate_credentials;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { user_id: String },
    SignedOut,
}

pub struct AuthController<'a, B> {
    backend: &'a B,
    session: Arc<SessionStore>,
    events: Option<UnboundedSender<AuthEvent>>,
}

impl<'a, B: CatalogueBackend> AuthController<'a, B> {
    pub fn new(backend: &'a B, session: Arc<SessionStore>) -> Self {
        Self {
            backend,
            session,
            events: None,
        }
    }

    /// Send auth events to `events` from now on.
    pub fn with_events(mut self, events: UnboundedSender<AuthEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: AuthEvent) {
        if let Some(events) = &self.events
            && events.send(event).is_err()
        {
            tracing::debug!("auth event receiver dropped");
        }
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<AuthGrant> {
        validate_credentials(credentials)?;
        let grant = self.backend.signup(credentials).await?;
        self.establish(&grant).await?;
        Ok(grant)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        validate_credentials(credentials)?;
        let grant = self.backend.login(credentials).await?;
        self.establish(&grant).await?;
        Ok(grant)
    }

    async fn establish(&self, grant: &AuthGrant) -> Result<()> {
        self.session.set_token(&grant.token)?;
        self.session.set_user_id(Some(grant.user_id.clone()));
        tracing::info!(user_id = %grant.user_id, "signed in");
        self.refresh_bookmarks().await?;
        self.emit(AuthEvent::SignedIn {
            user_id: grant.user_id.clone(),
        });
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear_token()?;
        tracing::info!("signed out");
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    /// Resume a persisted session.
    ///
    /// Returns the user id when the stored token is still accepted. A token
    /// the backend no longer recognises is cleared.
    pub async fn restore(&self) -> Result<Option<String>> {
        if !self.session.has_token() {
            return Ok(None);
        }

        match self.backend.check_auth().await? {
            Some(user_id) => {
                self.session.set_user_id(Some(user_id.clone()));
                self.refresh_bookmarks().await?;
                Ok(Some(user_id))
            }
            None => {
                tracing::info!("stored token rejected, clearing session");
                self.session.clear_token()?;
                Ok(None)
            }
        }
    }

    /// Replace the session bookmark set with the backend's view.
    pub async fn refresh_bookmarks(&self) -> Result<BookmarkSet> {
        let ids = self.backend.list_bookmarks().await?;
        self.session.replace_bookmarks(ids.clone());
        Ok(ids)
    }

    pub async fn add_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        self.require_token()?;
        let status = self.backend.add_bookmark(id).await?;
        Ok(self.record(id, status))
    }

    pub async fn remove_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        self.require_token()?;
        let status = self.backend.remove_bookmark(id).await?;
        Ok(self.record(id, status))
    }

    /// Bookmark `id` if it is not bookmarked yet, otherwise remove it.
    pub async fn toggle_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        if self.session.is_bookmarked(id) {
            self.remove_bookmark(id).await
        } else {
            self.add_bookmark(id).await
        }
    }

    fn require_token(&self) -> Result<()> {
        if self.session.has_token() {
            Ok(())
        } else {
            Err(CatalogueError::NotAuthenticated)
        }
    }

    /// Mirror a backend bookmark result into the session set.
    fn record(&self, id: PoseId, status: BookmarkStatus) -> BookmarkStatus {
        let bookmarked = matches!(
            status,
            BookmarkStatus::NewlyBookmarked | BookmarkStatus::AlreadyBookmarked
        );
        self.session.mark_bookmarked(id, bookmarked);
        status
    }
}
