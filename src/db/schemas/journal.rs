//! Journal entry document schema

use bson::{doc, Document};
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::IntoIndexes;
use crate::db::schemas::timestamp;

/// Collection name for journal entries
pub const JOURNAL_COLLECTION: &str = "journal_entries";

/// Journal entry stored in MongoDB
///
/// `model_title` and `section_slug` are free-text references and are not
/// checked against the catalog.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JournalEntryDoc {
    pub id: String,

    pub content: String,

    #[serde(default)]
    pub model_title: Option<String>,

    #[serde(default)]
    pub section_slug: Option<String>,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl JournalEntryDoc {
    /// Create a new entry stamped with a fresh id and the current time
    pub fn new(content: String, model_title: Option<String>, section_slug: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            model_title,
            section_slug,
            created_at: timestamp::now(),
        }
    }
}

impl IntoIndexes for JournalEntryDoc {
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
            (
                doc! { "created_at": -1 },
                Some(
                    IndexOptions::builder()
                        .name("created_at_desc".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
