#[macro_use]
mod macros;

pub mod auth;
pub mod catalogue;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod local;
pub mod normalize;
pub mod pagination;
pub mod paths;
pub mod query;
pub mod remote;
pub mod session;
pub mod storage;
pub mod types;
pub mod utils;

pub use auth::{AuthController, AuthEvent};
pub use catalogue::CatalogueService;
pub use config::Config;
pub use error::{CatalogueError, Result};
pub use local::LocalStore;
pub use pagination::PaginationController;
pub use query::{QueryState, SortField, SortOrder};
pub use remote::{CatalogueBackend, RemoteClient, RetryPolicy, Transport};
pub use session::SessionStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    AuthGrant, BookmarkSet, BookmarkStatus, Credentials, PageResult, Pagination, Pose, PoseId,
    QueryParams,
};
