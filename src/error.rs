use thiserror::Error;

use crate::remote::error::ApiError;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("invalid sort field '{0}', expected 'title' or 'category'")]
    InvalidSortField(String),

    #[error("invalid sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("malformed pose record: {0}")]
    MalformedPose(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("local dataset error: {0}")]
    Dataset(String),

    #[error("{0}")]
    Other(String),
}

impl CatalogueError {
    pub fn invalid_sort_field(s: String) -> Self {
        CatalogueError::InvalidSortField(s)
    }

    pub fn invalid_sort_order(s: String) -> Self {
        CatalogueError::InvalidSortOrder(s)
    }

    /// Validation faults are rejected before any network call and never
    /// trigger a fallback to the local store.
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogueError::InvalidCredentials(_))
    }
}

impl From<ApiError> for CatalogueError {
    fn from(error: ApiError) -> Self {
        CatalogueError::Api(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogueError>;
