use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{App, CommandOutput};
use crate::error::Result;
use crate::pagination::PaginationController;
use crate::query::{QueryState, SortField, SortOrder};
use crate::remote::CatalogueBackend;
use crate::types::Pose;

pub struct PosesOptions {
    pub page: u32,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<SortField>,
    pub order: SortOrder,
    pub bookmarks_only: bool,
    pub all: bool,
}

/// A row in the pose listing table
#[derive(Tabled)]
struct PoseRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "")]
    bookmarked: String,
}

fn pose_row(pose: &Pose, bookmarked: bool) -> PoseRow {
    PoseRow {
        id: pose.id,
        title: pose.title.clone(),
        category: pose.category.clone(),
        level: if pose.level.is_empty() {
            "-".to_string()
        } else {
            pose.level.clone()
        },
        tags: if pose.tags.is_empty() {
            "-".to_string()
        } else {
            pose.tags.join(", ")
        },
        bookmarked: if bookmarked { "*".to_string() } else { String::new() },
    }
}

/// List poses through the pagination controller, applying the local
/// bookmarks-only filter and client-side sort on top.
pub async fn cmd_poses(app: &App, options: PosesOptions, json: bool) -> Result<()> {
    let mut state = QueryState::new(options.limit.unwrap_or(app.config.page_size));
    if let Some(search) = &options.search {
        state.update_search(search);
    }
    if let Some(category) = &options.category {
        state.update_category(category);
    }
    state.update_sort(options.sort, options.order);
    if options.bookmarks_only {
        state.toggle_bookmarks_only();
    }

    if app.session.has_token() {
        app.auth().restore().await?;
    }

    let controller = PaginationController::new(&app.service);
    controller.load_first_page(state.params()).await?;
    let target = if options.all { u32::MAX } else { options.page };
    while controller.current_page() < target && controller.load_next_page().await?.is_some() {}

    // Without --all only the requested page is shown.
    let loaded = controller.poses();
    let limit = state.params().limit as usize;
    let page_poses: Vec<Pose> = if options.all {
        loaded
    } else if controller.current_page() == options.page {
        let start = (options.page as usize - 1) * limit;
        loaded.into_iter().skip(start).collect()
    } else {
        Vec::new()
    };

    let bookmarked = app.session.bookmarks();
    let visible = state.visible_poses(page_poses, &bookmarked);

    let json_output = json!({
        "page": if options.all { None } else { Some(options.page) },
        "limit": limit,
        "has_more": controller.has_more(),
        "offline": app.service.is_local(),
        "items": visible,
    });

    let mut text = String::new();
    if visible.is_empty() {
        text.push_str("No poses found.");
    } else {
        let rows: Vec<PoseRow> = visible
            .iter()
            .map(|pose| pose_row(pose, bookmarked.contains(&pose.id)))
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        text.push_str(&table.to_string());
        text.push_str(&format!("\n\n{} pose(s)", visible.len()));
        if controller.has_more() && !options.all {
            text.push_str(&format!(
                " {}",
                format!("(more on page {})", options.page + 1).dimmed()
            ));
        }
    }
    if let Some(notice) = app.mode_notice() {
        text.push('\n');
        text.push_str(&notice);
    }

    CommandOutput::new(json_output).with_text(text).print(json)
}

pub async fn cmd_categories(app: &App, json: bool) -> Result<()> {
    let categories = app.service.fetch_categories().await?;

    let mut text = if categories.is_empty() {
        "No categories found.".to_string()
    } else {
        categories
            .iter()
            .map(|c| format!("  {}", c.cyan()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    if let Some(notice) = app.mode_notice() {
        text.push('\n');
        text.push_str(&notice);
    }

    CommandOutput::new(json!({
        "categories": categories,
        "offline": app.service.is_local(),
    }))
    .with_text(text)
    .print(json)
}
