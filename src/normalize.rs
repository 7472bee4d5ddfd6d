//! Field-name coalescing for pose records.
//!
//! Different API revisions and the bundled dataset spell some fields
//! differently. Records are deserialized into [`RawPose`] and collapsed into the
//! canonical [`Pose`] exactly once, at the data-source boundary.
//!
//! Precedence when several spellings are present (first wins):
//!
//! | canonical      | accepted spellings                           |
//! |----------------|----------------------------------------------|
//! | `imageUrl`     | `imageUrl`, `image_url`, `image`             |
//! | `videoUrl`     | `videoUrl`, `video_url`                      |
//! | `level`        | `level`, `difficulty`, `difficulty_level`    |
//! | `description`  | `description`, `desc`                        |
//! | `createdAt`    | `createdAt`, `created_at`                    |
//! | `updatedAt`    | `updatedAt`, `updated_at`                    |
//! | `publishedAt`  | `publishedAt`, `published_at`                |

use serde::Deserialize;

use crate::error::{CatalogueError, Result};
use crate::types::{Pose, PoseId};

/// Tags arrive either as a list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<String>),
    Joined(String),
}

impl RawTags {
    fn into_vec(self) -> Vec<String> {
        let tags = match self {
            RawTags::List(tags) => tags,
            RawTags::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };
        tags.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// A pose record as it appears on the wire, before coalescing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPose {
    pub id: Option<PoseId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub desc: Option<String>,
    pub category: Option<String>,
    pub tags: Option<RawTags>,

    pub level: Option<String>,
    pub difficulty: Option<String>,
    pub difficulty_level: Option<String>,

    #[serde(rename = "imageUrl")]
    pub image_url_camel: Option<String>,
    pub image_url: Option<String>,
    pub image: Option<String>,

    #[serde(rename = "videoUrl")]
    pub video_url_camel: Option<String>,
    pub video_url: Option<String>,

    pub benefits: Option<String>,
    pub keys: Option<String>,
    pub cautions: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at_camel: Option<String>,
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at_camel: Option<String>,
    pub updated_at: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at_camel: Option<String>,
    pub published_at: Option<String>,
}

/// First non-blank value wins.
fn coalesce<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

impl RawPose {
    /// Collapse alternate spellings into the canonical shape.
    pub fn normalize(self) -> Result<Pose> {
        let id = self.id.ok_or_else(|| {
            CatalogueError::MalformedPose(format!(
                "record without id (title: {})",
                self.title.as_deref().unwrap_or("<none>")
            ))
        })?;

        Ok(Pose {
            id,
            title: self.title.unwrap_or_default(),
            description: coalesce([self.description, self.desc]).unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            tags: self.tags.map(RawTags::into_vec).unwrap_or_default(),
            level: coalesce([self.level, self.difficulty, self.difficulty_level])
                .unwrap_or_default(),
            image_url: coalesce([self.image_url_camel, self.image_url, self.image]),
            video_url: coalesce([self.video_url_camel, self.video_url]),
            benefits: self.benefits.unwrap_or_default(),
            keys: self.keys.unwrap_or_default(),
            cautions: self.cautions.unwrap_or_default(),
            created_at: coalesce([self.created_at_camel, self.created_at]),
            updated_at: coalesce([self.updated_at_camel, self.updated_at]),
            published_at: coalesce([self.published_at_camel, self.published_at]),
        })
    }
}

/// Normalize a batch of raw records, failing on the first malformed one.
pub fn normalize_all(raw: Vec<RawPose>) -> Result<Vec<Pose>> {
    raw.into_iter().map(RawPose::normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawPose {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_snake_case_fields_are_coalesced() {
        let pose = parse(
            r#"{"id": 7, "title": "Crow", "image_url": "crow.png",
                "video_url": "crow.mp4", "difficulty": "Advanced",
                "created_at": "2024-01-01"}"#,
        )
        .normalize()
        .unwrap();
        assert_eq!(pose.image_url.as_deref(), Some("crow.png"));
        assert_eq!(pose.video_url.as_deref(), Some("crow.mp4"));
        assert_eq!(pose.level, "Advanced");
        assert_eq!(pose.created_at.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_canonical_field_wins_over_alternate() {
        let pose = parse(
            r#"{"id": 1, "imageUrl": "canonical.png", "image_url": "alt.png",
                "level": "Beginner", "difficulty": "Expert"}"#,
        )
        .normalize()
        .unwrap();
        assert_eq!(pose.image_url.as_deref(), Some("canonical.png"));
        assert_eq!(pose.level, "Beginner");
    }

    #[test]
    fn test_blank_canonical_falls_through() {
        let pose = parse(r#"{"id": 1, "level": "", "difficulty": "Intermediate"}"#)
            .normalize()
            .unwrap();
        assert_eq!(pose.level, "Intermediate");
    }

    #[test]
    fn test_joined_tags_are_split() {
        let pose = parse(r#"{"id": 2, "tags": "hips, balance,, strength "}"#)
            .normalize()
            .unwrap();
        assert_eq!(pose.tags, vec!["hips", "balance", "strength"]);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let err = parse(r#"{"title": "Nameless"}"#).normalize().unwrap_err();
        assert!(matches!(err, CatalogueError::MalformedPose(_)));
        assert!(err.to_string().contains("Nameless"));
    }

    #[test]
    fn test_defaults_for_missing_text() {
        let pose = parse(r#"{"id": 3}"#).normalize().unwrap();
        assert_eq!(pose.title, "");
        assert!(pose.tags.is_empty());
        assert!(pose.image_url.is_none());
    }
}
