use clap::{Parser, Subcommand};

use crate::query::{SortField, SortOrder};
use crate::types::PoseId;

#[derive(Parser)]
#[command(name = "yoga")]
#[command(about = "Browse the yoga pose catalogue")]
#[command(version)]
pub struct Cli {
    /// Skip the remote API and use the bundled pose dataset
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List poses, one page at a time
    #[command(visible_alias = "ls")]
    Poses {
        /// Page to show (1-based)
        #[arg(short, long, default_value_t = 1, value_parser = parse_page)]
        page: u32,

        /// Poses per page (default: from config)
        #[arg(short, long, value_parser = parse_page)]
        limit: Option<u32>,

        /// Case-insensitive text to look for
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category label ("all" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Sort field: title, category
        #[arg(long, value_parser = parse_sort_field)]
        sort: Option<SortField>,

        /// Sort order: asc, desc
        #[arg(long, default_value = "asc", value_parser = parse_sort_order)]
        order: SortOrder,

        /// Only show bookmarked poses
        #[arg(short, long)]
        bookmarks_only: bool,

        /// Keep loading pages until the last one
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the distinct pose categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account and sign in
    Signup {
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in to an existing account
    Login {
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the stored session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show who the stored session belongs to
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage bookmarks
    #[command(visible_alias = "bm")]
    Bookmark {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum BookmarkAction {
    /// Bookmark a pose
    Add {
        #[arg(value_parser = parse_pose_id)]
        id: PoseId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a bookmark
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_parser = parse_pose_id)]
        id: PoseId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List bookmarked pose ids
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// Key (api_base_url, page_size, retry.max_attempts, retry.backoff_ms, remote_timeout, offline)
        key: String,

        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the config file path
    Path,
}

impl Cli {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            App, PosesOptions, cmd_bookmark_add, cmd_bookmark_ls, cmd_bookmark_remove,
            cmd_categories, cmd_config_path, cmd_config_set, cmd_config_show, cmd_login,
            cmd_logout, cmd_poses, cmd_signup, cmd_whoami,
        };

        let offline = self.offline;
        match self.command {
            Commands::Poses {
                page,
                limit,
                search,
                category,
                sort,
                order,
                bookmarks_only,
                all,
                json,
            } => {
                let app = App::load(offline)?;
                cmd_poses(
                    &app,
                    PosesOptions {
                        page,
                        limit,
                        search,
                        category,
                        sort,
                        order,
                        bookmarks_only,
                        all,
                    },
                    json,
                )
                .await
            }
            Commands::Categories { json } => cmd_categories(&App::load(offline)?, json).await,
            Commands::Signup {
                username,
                password,
                json,
            } => cmd_signup(&App::load(offline)?, &username, password, json).await,
            Commands::Login {
                username,
                password,
                json,
            } => cmd_login(&App::load(offline)?, &username, password, json).await,
            Commands::Logout { json } => cmd_logout(&App::load(offline)?, json),
            Commands::Whoami { json } => cmd_whoami(&App::load(offline)?, json).await,
            Commands::Bookmark { action } => {
                let app = App::load(offline)?;
                match action {
                    BookmarkAction::Add { id, json } => cmd_bookmark_add(&app, id, json).await,
                    BookmarkAction::Remove { id, json } => {
                        cmd_bookmark_remove(&app, id, json).await
                    }
                    BookmarkAction::Ls { json } => cmd_bookmark_ls(&app, json).await,
                }
            }
            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Path => cmd_config_path(),
            },
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort field",
        SortField::ALL_STRINGS,
    )
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort order",
        SortOrder::ALL_STRINGS,
    )
}

fn parse_page(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a positive number")),
    }
}

fn parse_pose_id(s: &str) -> Result<PoseId, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid pose id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_field_lists_valid_values() {
        assert_eq!(parse_sort_field("Title").unwrap(), SortField::Title);
        let err = parse_sort_field("level").unwrap_err();
        assert!(err.contains("title, category"));
    }

    #[test]
    fn test_parse_page_rejects_zero() {
        assert_eq!(parse_page("2").unwrap(), 2);
        assert!(parse_page("0").is_err());
        assert!(parse_page("-1").is_err());
    }

    #[test]
    fn test_parse_pose_id() {
        assert_eq!(parse_pose_id(" 12 ").unwrap(), 12);
        assert!(parse_pose_id("twelve").is_err());
    }

    #[test]
    fn test_cli_parses_poses_flags() {
        let cli = Cli::try_parse_from([
            "yoga", "poses", "--search", "tree", "--sort", "category", "--order", "desc",
            "--offline",
        ])
        .unwrap();
        assert!(cli.offline);
        let Commands::Poses {
            search,
            sort,
            order,
            page,
            ..
        } = cli.command
        else {
            panic!("expected poses command");
        };
        assert_eq!(search.as_deref(), Some("tree"));
        assert_eq!(sort, Some(SortField::Category));
        assert_eq!(order, SortOrder::Desc);
        assert_eq!(page, 1);
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
