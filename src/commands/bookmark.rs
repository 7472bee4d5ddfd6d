use owo_colors::OwoColorize;
use serde_json::json;

use super::{App, CommandOutput};
use crate::error::{CatalogueError, Result};
use crate::types::{BookmarkStatus, PoseId};

/// Resume the stored session or fail: bookmarks need a signed-in user.
async fn require_session(app: &App) -> Result<()> {
    match app.auth().restore().await? {
        Some(_) => Ok(()),
        None => Err(CatalogueError::NotAuthenticated),
    }
}

fn status_output(id: PoseId, status: BookmarkStatus) -> CommandOutput {
    let marker = match status {
        BookmarkStatus::NewlyBookmarked | BookmarkStatus::NewlyDeleted => "✓".green().to_string(),
        BookmarkStatus::AlreadyBookmarked | BookmarkStatus::AlreadyDeleted => {
            "-".dimmed().to_string()
        }
    };
    CommandOutput::new(json!({
        "id": id,
        "status": status.message(),
    }))
    .with_text(format!("{marker} Pose {}: {status}", id.to_string().cyan()))
}

pub async fn cmd_bookmark_add(app: &App, id: PoseId, json: bool) -> Result<()> {
    require_session(app).await?;
    let status = app.auth().add_bookmark(id).await?;
    status_output(id, status).print(json)
}

pub async fn cmd_bookmark_remove(app: &App, id: PoseId, json: bool) -> Result<()> {
    require_session(app).await?;
    let status = app.auth().remove_bookmark(id).await?;
    status_output(id, status).print(json)
}

pub async fn cmd_bookmark_ls(app: &App, json: bool) -> Result<()> {
    require_session(app).await?;
    let ids = app.session.bookmarks();

    let text = if ids.is_empty() {
        "No bookmarks.".to_string()
    } else {
        ids.iter()
            .map(|id| format!("  {}", id.to_string().cyan()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    CommandOutput::new(json!({ "ids": ids }))
        .with_text(text)
        .print(json)
}
