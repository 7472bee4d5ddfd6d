mod auth;
mod bookmark;
mod config;
mod poses;

pub use auth::{cmd_login, cmd_logout, cmd_signup, cmd_whoami};
pub use bookmark::{cmd_bookmark_add, cmd_bookmark_ls, cmd_bookmark_remove};
pub use config::{cmd_config_path, cmd_config_set, cmd_config_show};
pub use poses::{PosesOptions, cmd_categories, cmd_poses};

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::auth::AuthController;
use crate::catalogue::CatalogueService;
use crate::config::Config;
use crate::error::Result;
use crate::paths::storage_path;
use crate::session::SessionStore;
use crate::storage::FileStore;

/// Everything a command needs: effective config, the durable session, and
/// the catalogue service wired on top of both.
pub struct App {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub service: CatalogueService,
}

impl App {
    /// Load config and storage from the data root. `offline` forces local mode.
    pub fn load(offline: bool) -> Result<Self> {
        let mut config = Config::load()?;
        config.offline |= offline;

        let store = FileStore::open(storage_path())?;
        let session = Arc::new(SessionStore::new(Arc::new(store)));
        let service = CatalogueService::from_config(&config, session.clone())?;

        Ok(Self {
            config,
            session,
            service,
        })
    }

    pub fn auth(&self) -> AuthController<'_, CatalogueService> {
        AuthController::new(&self.service, self.session.clone())
    }

    /// Dimmed notice shown after text output when the session ran on local data.
    pub fn mode_notice(&self) -> Option<String> {
        self.service
            .is_local()
            .then(|| "(offline: showing bundled data)".dimmed().to_string())
    }
}

/// A command result that can be printed as JSON or as text.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, json: bool) -> Result<()> {
        if json {
            return print_json(&self.json);
        }
        if let Some(text) = self.text {
            println!("{text}");
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
