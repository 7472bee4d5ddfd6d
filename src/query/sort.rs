//! Sort keys and comparison helpers for poses.
//!
//! Both the local fallback store and the client-side view sort use these, so
//! remote and local ordering agree.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::types::Pose;

/// Field a pose listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Title,
    Category,
}

enum_display_fromstr!(
    SortField,
    crate::error::CatalogueError::invalid_sort_field,
    {
        Title => "title",
        Category => "category",
    }
);

/// Sort direction. Ascending unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

enum_display_fromstr!(
    SortOrder,
    crate::error::CatalogueError::invalid_sort_order,
    {
        Asc => "asc",
        Desc => "desc",
    }
);

impl SortField {
    fn key<'a>(&self, pose: &'a Pose) -> &'a str {
        match self {
            SortField::Title => &pose.title,
            SortField::Category => &pose.category,
        }
    }
}

thread_local! {
    // Secondary strength: accents count, case does not.
    static COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(error = %e, "collator unavailable, falling back to case folding");
                None
            }
        }
    };
}

/// Case-insensitive, accent-aware comparison using root-locale collation, so
/// "Ärmel" sorts between "Apple" and "Zebra".
pub fn compare_text(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => UniCase::new(a).cmp(&UniCase::new(b)),
    })
}

/// Compare two poses on a single field, ascending.
pub fn compare_by(field: SortField, a: &Pose, b: &Pose) -> Ordering {
    compare_text(field.key(a), field.key(b))
}

/// Stable sort by `field`. Descending order is the exact reverse of the
/// ascending result, ties included.
pub fn sort_poses_by(poses: &mut [Pose], field: SortField, order: SortOrder) {
    poses.sort_by(|a, b| compare_by(field, a, b));
    if order == SortOrder::Desc {
        poses.reverse();
    }
}
