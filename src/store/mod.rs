//! Storage seam for lattice
//!
//! Services talk to a [`Store`] handle constructed once in `main` and passed
//! down through `AppState`. Two backends implement it:
//!
//! - [`MongoStore`]: the production document store
//! - [`InMemoryStore`]: development mode without MongoDB, and tests

mod memory;
mod mongo;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;

use crate::db::{ChallengeDoc, ChallengeLogDoc, JournalEntryDoc, ModelDoc, SectionDoc};
use crate::types::Result;

/// Filter over the model catalog
///
/// Results are always ordered by (section_index, model_index).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelQuery {
    /// Exact section slug
    pub section: Option<String>,
    /// Case-insensitive literal substring of title, explanation or example
    pub search: Option<String>,
    /// Hard cap on the number of results; `None` returns the whole catalog
    pub limit: Option<usize>,
}

impl ModelQuery {
    /// Every model, in catalog order
    pub fn all() -> Self {
        Self::default()
    }

    /// Every model of one section, in catalog order
    pub fn section(slug: &str) -> Self {
        Self {
            section: Some(slug.to_string()),
            ..Self::default()
        }
    }

    /// Whether a model passes the section and search filters (ignores limit)
    pub fn matches(&self, model: &ModelDoc) -> bool {
        if let Some(ref section) = self.section {
            if &model.section_slug != section {
                return false;
            }
        }

        match self.search {
            Some(ref search) => model.mentions(&search.to_lowercase()),
            None => true,
        }
    }
}

/// Persistence operations used by the services
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Check the backend is reachable
    async fn ping(&self) -> Result<()>;

    // Catalog

    async fn count_sections(&self) -> Result<u64>;

    async fn insert_sections(&self, sections: &[SectionDoc]) -> Result<usize>;

    /// All sections ordered by index
    async fn list_sections(&self) -> Result<Vec<SectionDoc>>;

    async fn count_models(&self) -> Result<u64>;

    async fn insert_models(&self, models: &[ModelDoc]) -> Result<usize>;

    async fn find_models(&self, query: &ModelQuery) -> Result<Vec<ModelDoc>>;

    async fn find_model(&self, section_slug: &str, model_index: i32) -> Result<Option<ModelDoc>>;

    /// Models whose id is in `ids`, in catalog order
    async fn find_models_by_ids(&self, ids: &[String]) -> Result<Vec<ModelDoc>>;

    // Journal

    /// Newest entries first
    async fn list_journal(&self, limit: usize) -> Result<Vec<JournalEntryDoc>>;

    async fn count_journal(&self) -> Result<u64>;

    async fn insert_journal(&self, entry: &JournalEntryDoc) -> Result<()>;

    /// Returns false if no entry had this id
    async fn delete_journal(&self, id: &str) -> Result<bool>;

    // Challenge

    /// Deactivate the current active challenge (if any) and insert `challenge`
    /// as the new active one. Never leaves two challenges active.
    async fn start_challenge(&self, challenge: &ChallengeDoc) -> Result<()>;

    async fn active_challenge(&self) -> Result<Option<ChallengeDoc>>;

    async fn count_challenges(&self) -> Result<u64>;

    /// Add `day` to the challenge's completed set (no-op if present)
    async fn add_completed_day(&self, challenge_id: &str, day: i32) -> Result<()>;

    async fn insert_challenge_log(&self, log: &ChallengeLogDoc) -> Result<()>;

    /// Logs for one challenge, newest first
    async fn list_challenge_logs(&self, challenge_id: &str) -> Result<Vec<ChallengeLogDoc>>;

    /// Remove a challenge and all of its logs; returns false if the
    /// challenge did not exist
    async fn delete_challenge(&self, id: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(slug: &str, title: &str) -> ModelDoc {
        ModelDoc {
            section_slug: slug.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_query_all_matches_everything() {
        assert!(ModelQuery::all().matches(&model("a", "Anything")));
    }

    #[test]
    fn test_query_section_and_search_combine() {
        let query = ModelQuery {
            section: Some("thinking-smarter".into()),
            search: Some("INVERSION".into()),
            limit: None,
        };
        assert!(query.matches(&model("thinking-smarter", "Inversion")));
        assert!(!query.matches(&model("deciding-better", "Inversion")));
        assert!(!query.matches(&model("thinking-smarter", "Second-Order Thinking")));
    }
}
