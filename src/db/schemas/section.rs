//! Section document schema
//!
//! A section is a topical grouping of models. Written once by seeding.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for sections
pub const SECTION_COLLECTION: &str = "sections";

/// Section document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SectionDoc {
    /// Ordering key (1-based)
    pub index: i32,

    /// Full section name
    pub name: String,

    /// URL slug, unique across sections
    pub slug: String,

    /// Name used in navigation and denormalized onto models
    pub short_name: String,

    pub description: String,

    /// Icon key understood by the frontend (brain, target, ...)
    pub icon: String,

    /// Number of models in this section at seed time
    #[serde(default)]
    pub model_count: i32,
}

impl IntoIndexes for SectionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "index": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("index_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "slug": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("slug_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
