//! Mental model document schema
//!
//! Each model belongs to one section; the section's slug and short name are
//! copied onto the model so list views need no join.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for mental models
pub const MODEL_COLLECTION: &str = "mental_models";

/// Mental model document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ModelDoc {
    /// Generated UUID, unique across models
    pub id: String,

    pub section_index: i32,
    pub section_slug: String,
    pub section_name: String,

    /// Position within the section (1-based)
    pub model_index: i32,

    pub title: String,
    pub explanation: String,
    pub example: String,
    pub ai_prompt: String,
}

impl ModelDoc {
    /// Case-insensitive substring match over title, explanation and example
    ///
    /// `needle` must already be lowercased.
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.explanation.to_lowercase().contains(needle)
            || self.example.to_lowercase().contains(needle)
    }

    /// Catalog ordering key
    pub fn sort_key(&self) -> (i32, i32) {
        (self.section_index, self.model_index)
    }
}

impl IntoIndexes for ModelDoc {
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
            // External address of a model
            (
                doc! { "section_slug": 1, "model_index": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("section_slug_model_index_unique".to_string())
                        .build(),
                ),
            ),
            // Catalog ordering
            (
                doc! { "section_index": 1, "model_index": 1 },
                Some(
                    IndexOptions::builder()
                        .name("catalog_order".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
