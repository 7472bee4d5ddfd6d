//! HTTP client for the yoga catalogue API.

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, classify_response};
use super::retry::{RetryPolicy, execute_with_retry};
use super::transport::{ApiRequest, ReqwestTransport, Transport};
use super::CatalogueBackend;
use crate::config::Config;
use crate::error::Result;
use crate::normalize::{RawPose, normalize_all};
use crate::session::SessionStore;
use crate::types::{
    AuthGrant, BookmarkSet, BookmarkStatus, Credentials, PageResult, Pagination, PoseId,
    QueryParams,
};

/// User ids are numeric on some API revisions and strings on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireUserId {
    Number(i64),
    Text(String),
}

impl WireUserId {
    fn into_string(self) -> String {
        match self {
            WireUserId::Number(n) => n.to_string(),
            WireUserId::Text(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WirePagination {
    page: Option<u32>,
    limit: Option<u32>,
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PosesResponse {
    items: Vec<RawPose>,
    #[serde(default)]
    pagination: WirePagination,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    user_id: WireUserId,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CheckAuthResponse {
    user_id: Option<WireUserId>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct BookmarksResponse {
    item_ids: Vec<PoseId>,
}

/// Remote data source. Reads the bearer token from the session but never
/// mutates it; callers own session updates.
pub struct RemoteClient<T = ReqwestTransport> {
    transport: T,
    session: Arc<SessionStore>,
    retry: RetryPolicy,
}

impl RemoteClient<ReqwestTransport> {
    /// Create a reqwest-backed client from configuration
    pub fn from_config(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(transport, session).with_retry(RetryPolicy::from(&config.retry)))
    }
}

impl<T: Transport> RemoteClient<T> {
    pub fn new(transport: T, session: Arc<SessionStore>) -> Self {
        Self {
            transport,
            session,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` with retry, then decode the body as `R`.
    ///
    /// The request is rebuilt for every attempt so a token set in the meantime
    /// is picked up. A body that parses but has the wrong shape is terminal.
    async fn call<R: DeserializeOwned>(
        &self,
        operation: &str,
        request: ApiRequest,
        authenticated: bool,
    ) -> std::result::Result<R, ApiError> {
        let transport = &self.transport;
        let session = &self.session;
        let request = &request;

        execute_with_retry(&self.retry, operation, move || async move {
            let mut attempt = request.clone();
            if authenticated {
                attempt = attempt.with_headers(session.get_auth_header());
            }
            let response = transport.send(attempt).await?;
            let status = response.status;
            let value = classify_response(status, &response.body)?;
            serde_json::from_value::<R>(value).map_err(|e| {
                ApiError::terminal(format!("unexpected response shape: {e}"), Some(status))
            })
        })
        .await
    }

    async fn bookmark_call(&self, method: Method, id: PoseId) -> Result<BookmarkStatus> {
        let operation = if method == Method::DELETE {
            "remove_bookmark"
        } else {
            "add_bookmark"
        };
        let request = ApiRequest::new(method, format!("/bookmarks/{id}"));
        let response: MessageResponse = self.call(operation, request, true).await?;
        response.message.parse()
    }
}

impl<T: Transport> CatalogueBackend for RemoteClient<T> {
    async fn fetch_poses(&self, params: &QueryParams) -> Result<PageResult> {
        let request =
            ApiRequest::new(Method::GET, "/yoga-poses").with_query(params.to_query_pairs());
        let response: PosesResponse = self.call("fetch_poses", request, false).await?;

        let mut items = normalize_all(response.items)?;
        if items.len() > params.limit as usize {
            tracing::warn!(
                received = items.len(),
                limit = params.limit,
                "server returned more poses than requested; truncating"
            );
            items.truncate(params.limit as usize);
        }

        let pagination = Pagination {
            page: response.pagination.page.unwrap_or(params.page),
            limit: response.pagination.limit.unwrap_or(params.limit),
            total: response.pagination.total.unwrap_or(items.len() as u64),
        };
        Ok(PageResult { items, pagination })
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        let request = ApiRequest::new(Method::GET, "/yoga-poses/categories");
        let response: CategoriesResponse = self.call("fetch_categories", request, false).await?;
        Ok(response.categories)
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthGrant> {
        let request =
            ApiRequest::new(Method::POST, "/auth/signup").with_body(serde_json::to_value(credentials)?);
        let response: AuthResponse = self.call("signup", request, true).await?;
        Ok(AuthGrant {
            user_id: response.user_id.into_string(),
            token: response.token,
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        let request =
            ApiRequest::new(Method::POST, "/auth/login").with_body(serde_json::to_value(credentials)?);
        let response: AuthResponse = self.call("login", request, true).await?;
        Ok(AuthGrant {
            user_id: response.user_id.into_string(),
            token: response.token,
        })
    }

    async fn check_auth(&self) -> Result<Option<String>> {
        let request = ApiRequest::new(Method::GET, "/auth/check");
        let response: CheckAuthResponse = self.call("check_auth", request, true).await?;
        Ok(response.user_id.map(WireUserId::into_string))
    }

    async fn add_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        self.bookmark_call(Method::POST, id).await
    }

    async fn remove_bookmark(&self, id: PoseId) -> Result<BookmarkStatus> {
        self.bookmark_call(Method::DELETE, id).await
    }

    async fn list_bookmarks(&self) -> Result<BookmarkSet> {
        let request = ApiRequest::new(Method::GET, "/bookmarks");
        let response: BookmarksResponse = self.call("list_bookmarks", request, true).await?;
        Ok(response.item_ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use reqwest::header;

    use super::*;
    use crate::remote::transport::ApiResponse;
    use crate::storage::MemoryStore;

    /// Replays canned responses and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<std::result::Result<ApiResponse, ApiError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.lock().push_back(Ok(ApiResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.responses
                .lock()
                .push_back(Err(ApiError::network(message)));
            self
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().clone()
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, ApiError> {
            self.requests.lock().push(request);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::network("script exhausted")))
        }
    }

    fn client(transport: ScriptedTransport) -> (Arc<SessionStore>, RemoteClient<ScriptedTransport>) {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        let client = RemoteClient::new(transport, session.clone()).with_retry(RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(1000),
        });
        (session, client)
    }

    const TEST_FAULT: &str = r#"{"error": "simulated outage", "is_test_error": true}"#;

    #[tokio::test]
    async fn test_fetch_poses_normalizes_and_serializes_query() {
        let body = r#"{
            "items": [
                {"id": 1, "title": "Tree", "category": "Balance", "image_url": "tree.png", "difficulty": "Beginner"},
                {"id": 2, "title": "Crow", "category": "Balance", "imageUrl": "crow.png", "level": "Advanced"}
            ],
            "pagination": {"page": 2, "limit": 2, "total": 6}
        }"#;
        let (_, client) = client(ScriptedTransport::default().reply(200, body));

        let params = QueryParams {
            page: 2,
            limit: 2,
            category: Some("Balance".to_string()),
            ..Default::default()
        };
        let page = client.fetch_poses(&params).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].image_url.as_deref(), Some("tree.png"));
        assert_eq!(page.items[0].level, "Beginner");
        assert_eq!(page.pagination.total, 6);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/yoga-poses");
        assert!(
            requests[0]
                .query
                .contains(&("category".to_string(), "Balance".to_string()))
        );
        assert!(!requests[0].query.iter().any(|(k, _)| k == "search"));
    }

    #[tokio::test]
    async fn test_listing_does_not_send_authorization() {
        let (session, client) =
            client(ScriptedTransport::default().reply(200, r#"{"categories": ["Standing"]}"#));
        session.set_token("secret-token").unwrap();

        let categories = client.fetch_categories().await.unwrap();
        assert_eq!(categories, vec!["Standing"]);

        let requests = client.transport().requests();
        assert!(requests[0].headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(
            requests[0].headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_bookmark_calls_send_bearer_token() {
        let (session, client) = client(
            ScriptedTransport::default()
                .reply(200, r#"{"message": "newly bookmarked"}"#)
                .reply(200, r#"{"message": "already deleted"}"#),
        );
        session.set_token("tok").unwrap();

        assert_eq!(
            client.add_bookmark(9).await.unwrap(),
            BookmarkStatus::NewlyBookmarked
        );
        assert_eq!(
            client.remove_bookmark(9).await.unwrap(),
            BookmarkStatus::AlreadyDeleted
        );

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/bookmarks/9");
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(
            requests[0].headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_faults_are_retried_until_success() {
        let transport = ScriptedTransport::default()
            .reply(500, TEST_FAULT)
            .reply(500, TEST_FAULT)
            .reply(200, r#"{"categories": ["Seated", "Standing"]}"#);
        let (_, client) = client(transport);

        let started = tokio::time::Instant::now();
        let categories = client.fetch_categories().await.unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(client.transport().requests().len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_is_retried() {
        let transport = ScriptedTransport::default()
            .fail("connection refused")
            .reply(200, r#"{"item_ids": [3, 1]}"#);
        let (_, client) = client(transport);

        let ids = client.list_bookmarks().await.unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_surfaces_immediately() {
        let transport = ScriptedTransport::default()
            .reply(400, r#"{"detail": "limit too large"}"#)
            .reply(200, r#"{"categories": []}"#);
        let (_, client) = client(transport);

        let err = client.fetch_categories().await.unwrap_err();
        assert!(err.to_string().contains("limit too large"));
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_login_accepts_numeric_user_id() {
        let (_, client) =
            client(ScriptedTransport::default().reply(200, r#"{"user_id": 42, "token": "abc"}"#));

        let grant = client
            .login(&Credentials::new("alice", "password1"))
            .await
            .unwrap();
        assert_eq!(grant.user_id, "42");
        assert_eq!(grant.token, "abc");

        let body = client.transport().requests()[0].body.clone().unwrap();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], "password1");
    }

    #[tokio::test]
    async fn test_check_auth_null_user() {
        let (_, client) = client(ScriptedTransport::default().reply(200, r#"{"user_id": null}"#));
        assert_eq!(client.check_auth().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_an_error() {
        let (_, client) = client(ScriptedTransport::default().reply(200, r#"{"things": []}"#));
        assert!(client.fetch_categories().await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_page_is_truncated() {
        let body = r#"{"items": [{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}]}"#;
        let (_, client) = client(ScriptedTransport::default().reply(200, body));

        let page = client
            .fetch_poses(&QueryParams::with_limit(3))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.pagination.page, 1);
    }
}
