//! Challenge and challenge log document schemas
//!
//! A challenge holds five model references as parallel arrays in the order
//! the user picked them. `current_day` and `streak` are derived on read and
//! never stored.

use bson::{doc, Document};
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::IntoIndexes;
use crate::db::schemas::{timestamp, ModelDoc};

/// Collection name for challenges
pub const CHALLENGE_COLLECTION: &str = "challenges";

/// Collection name for challenge completion logs
pub const CHALLENGE_LOG_COLLECTION: &str = "challenge_logs";

/// Challenge document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChallengeDoc {
    pub id: String,

    pub model_ids: Vec<String>,
    pub model_titles: Vec<String>,
    pub model_slugs: Vec<String>,
    pub model_indices: Vec<i32>,

    /// Completed day numbers (1-30), no duplicates
    #[serde(default)]
    pub completed_days: Vec<i32>,

    #[serde(with = "timestamp")]
    pub started_at: DateTime<Utc>,

    pub is_active: bool,
}

impl ChallengeDoc {
    /// Start a new active challenge over the given models, in order
    pub fn start(models: &[ModelDoc]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            model_ids: models.iter().map(|m| m.id.clone()).collect(),
            model_titles: models.iter().map(|m| m.title.clone()).collect(),
            model_slugs: models.iter().map(|m| m.section_slug.clone()).collect(),
            model_indices: models.iter().map(|m| m.model_index).collect(),
            completed_days: Vec::new(),
            started_at: timestamp::now(),
            is_active: true,
        }
    }

    /// Record a completed day; returns false if it was already recorded
    pub fn mark_completed(&mut self, day: i32) -> bool {
        if self.completed_days.contains(&day) {
            return false;
        }
        self.completed_days.push(day);
        true
    }
}

impl IntoIndexes for ChallengeDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("id_unique".to_string())
                        .build(),
                ),
            ),
            // At most one active challenge
            (
                doc! { "is_active": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "is_active": true })
                        .name("single_active".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

/// One completion event for a challenge day
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChallengeLogDoc {
    pub id: String,

    pub challenge_id: String,

    pub day: i32,

    #[serde(default)]
    pub reflection: Option<String>,

    #[serde(with = "timestamp")]
    pub completed_at: DateTime<Utc>,
}

impl ChallengeLogDoc {
    pub fn new(challenge_id: &str, day: i32, reflection: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            challenge_id: challenge_id.to_string(),
            day,
            reflection,
            completed_at: timestamp::now(),
        }
    }
}

impl IntoIndexes for ChallengeLogDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "challenge_id": 1, "completed_at": -1 },
            Some(
                IndexOptions::builder()
                    .name("challenge_id_completed_at".to_string())
                    .build(),
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, slug: &str, index: i32) -> ModelDoc {
        ModelDoc {
            id: id.into(),
            section_slug: slug.into(),
            model_index: index,
            title: format!("Model {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_start_keeps_model_order() {
        let models = vec![model("b", "s1", 2), model("a", "s2", 1)];
        let challenge = ChallengeDoc::start(&models);
        assert_eq!(challenge.model_ids, vec!["b", "a"]);
        assert_eq!(challenge.model_slugs, vec!["s1", "s2"]);
        assert_eq!(challenge.model_indices, vec![2, 1]);
        assert!(challenge.is_active);
        assert!(challenge.completed_days.is_empty());
    }

    #[test]
    fn test_mark_completed_deduplicates() {
        let mut challenge = ChallengeDoc::start(&[model("a", "s", 1)]);
        assert!(challenge.mark_completed(5));
        assert!(!challenge.mark_completed(5));
        assert_eq!(challenge.completed_days, vec![5]);
    }

    #[test]
    fn test_serialized_shape() {
        let challenge = ChallengeDoc::start(&[model("a", "s", 1)]);
        let value = serde_json::to_value(&challenge).unwrap();
        assert!(value["started_at"].as_str().unwrap().ends_with('Z'));
        assert_eq!(value["is_active"], true);
    }
}
