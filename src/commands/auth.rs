use std::io::{self, BufRead};

use owo_colors::OwoColorize;
use serde_json::json;

use super::{App, CommandOutput};
use crate::error::{CatalogueError, Result};
use crate::types::{AuthGrant, Credentials};

/// Use the given password, or read one line from stdin.
fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(CatalogueError::InvalidCredentials(
            "no password given (use --password or pipe it on stdin)".to_string(),
        ));
    }
    Ok(password)
}

fn signed_in_output(app: &App, verb: &str, username: &str, grant: &AuthGrant) -> CommandOutput {
    let mut text = format!(
        "{} {} as {} ({})",
        "✓".green(),
        verb,
        username.cyan(),
        grant.user_id.dimmed()
    );
    if let Some(notice) = app.mode_notice() {
        text.push('\n');
        text.push_str(&notice);
    }
    CommandOutput::new(json!({
        "user_id": grant.user_id,
        "username": username,
        "offline": app.service.is_local(),
    }))
    .with_text(text)
}

pub async fn cmd_signup(
    app: &App,
    username: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let credentials = Credentials::new(username.trim(), resolve_password(password)?);
    let grant = app.auth().signup(&credentials).await?;
    signed_in_output(app, "Signed up", username.trim(), &grant).print(json)
}

pub async fn cmd_login(
    app: &App,
    username: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let credentials = Credentials::new(username.trim(), resolve_password(password)?);
    let grant = app.auth().login(&credentials).await?;
    signed_in_output(app, "Signed in", username.trim(), &grant).print(json)
}

pub fn cmd_logout(app: &App, json: bool) -> Result<()> {
    let was_signed_in = app.session.has_token();
    app.auth().logout()?;

    let text = if was_signed_in {
        "Signed out".to_string()
    } else {
        "Not signed in".dimmed().to_string()
    };
    CommandOutput::new(json!({ "signed_out": was_signed_in }))
        .with_text(text)
        .print(json)
}

pub async fn cmd_whoami(app: &App, json: bool) -> Result<()> {
    let user_id = app.auth().restore().await?;
    let bookmarks = app.session.bookmarks();

    let text = match &user_id {
        Some(user_id) => format!(
            "{} ({} bookmark(s))",
            user_id.cyan(),
            bookmarks.len()
        ),
        None => "Not signed in".dimmed().to_string(),
    };
    CommandOutput::new(json!({
        "user_id": user_id,
        "bookmarks": bookmarks,
        "offline": app.service.is_local(),
    }))
    .with_text(text)
    .print(json)
}
