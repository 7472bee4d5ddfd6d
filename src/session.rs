//! Session store: bearer token, current user and bookmarks.
//!
//! The token and the local bookmark list round-trip through durable storage
//! under [`AUTH_TOKEN_KEY`] and [`LOCAL_BOOKMARKS_KEY`]. The user id and the
//! bookmarked-id set are session state, re-derived after every sign-in.

use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::{AUTH_TOKEN_KEY, BookmarkSet, LOCAL_BOOKMARKS_KEY, PoseId};

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    token: Mutex<Option<SecretString>>,
    user_id: Mutex<Option<String>>,
    bookmarks: Mutex<BookmarkSet>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("token", &self.has_token().then_some("[REDACTED]"))
            .field("user_id", &*self.user_id.lock())
            .field("bookmarks", &*self.bookmarks.lock())
            .finish()
    }
}

impl SessionStore {
    /// Build a session on top of `storage`, picking up a persisted token.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let token = storage
            .get(AUTH_TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        Self {
            storage,
            token: Mutex::new(token),
            user_id: Mutex::new(None),
            bookmarks: Mutex::new(BookmarkSet::new()),
        }
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.storage.set(AUTH_TOKEN_KEY, token)?;
        *self.token.lock() = Some(SecretString::from(token.to_string()));
        Ok(())
    }

    /// Forget the token along with everything derived from it.
    pub fn clear_token(&self) -> Result<()> {
        self.storage.remove(AUTH_TOKEN_KEY)?;
        *self.token.lock() = None;
        *self.user_id.lock() = None;
        self.bookmarks.lock().clear();
        Ok(())
    }

    pub fn has_token(&self) -> bool {
        self.token.lock().is_some()
    }

    /// The raw token, for callers that need to derive values from it.
    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// `Authorization: Bearer <token>` when a token is present, else empty.
    pub fn get_auth_header(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let guard = self.token.lock();
        let Some(token) = guard.as_ref() else {
            return headers;
        };

        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Stored auth token is not a valid header value; sending no credentials");
            }
        }
        headers
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_id.lock().clone()
    }

    pub fn set_user_id(&self, user_id: Option<String>) {
        *self.user_id.lock() = user_id;
    }

    /// The durable local bookmark list. Malformed content reads as empty.
    pub fn get_local_bookmarks(&self) -> Vec<PoseId> {
        let Some(raw) = self.storage.get(LOCAL_BOOKMARKS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<PoseId>>(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Ignoring malformed {LOCAL_BOOKMARKS_KEY} value: {e}");
                Vec::new()
            }
        }
    }

    pub fn set_local_bookmarks(&self, ids: &[PoseId]) -> Result<()> {
        let encoded = serde_json::to_string(ids)?;
        self.storage.set(LOCAL_BOOKMARKS_KEY, &encoded)
    }

    pub fn bookmarks(&self) -> BookmarkSet {
        self.bookmarks.lock().clone()
    }

    pub fn is_bookmarked(&self, id: PoseId) -> bool {
        self.bookmarks.lock().contains(&id)
    }

    pub fn replace_bookmarks(&self, ids: BookmarkSet) {
        *self.bookmarks.lock() = ids;
    }

    pub fn mark_bookmarked(&self, id: PoseId, bookmarked: bool) {
        let mut bookmarks = self.bookmarks.lock();
        if bookmarked {
            bookmarks.insert(id);
        } else {
            bookmarks.remove(&id);
        }
    }
}
