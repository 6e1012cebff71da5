//! In-memory store
//!
//! Used in development mode when MongoDB is unavailable, and by tests. All
//! collections live behind one lock so multi-collection writes (challenge
//! start, challenge delete) are atomic.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use crate::db::{ChallengeDoc, ChallengeLogDoc, JournalEntryDoc, ModelDoc, SectionDoc};
use crate::store::{ModelQuery, Store};
use crate::types::Result;

#[derive(Default)]
struct Collections {
    sections: Vec<SectionDoc>,
    models: Vec<ModelDoc>,
    journal: Vec<JournalEntryDoc>,
    challenges: Vec<ChallengeDoc>,
    challenge_logs: Vec<ChallengeLogDoc>,
}

/// Store holding every collection in process memory
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        warn!("Using in-memory store (data is lost on restart)");
        Self::default()
    }

    /// Number of challenges currently flagged active
    pub async fn active_count(&self) -> usize {
        self.inner
            .read()
            .await
            .challenges
            .iter()
            .filter(|c| c.is_active)
            .count()
    }

    /// Every challenge, active or not
    pub async fn all_challenges(&self) -> Vec<ChallengeDoc> {
        self.inner.read().await.challenges.clone()
    }
}

fn sorted_models<'a>(models: impl Iterator<Item = &'a ModelDoc>) -> Vec<ModelDoc> {
    let mut out: Vec<ModelDoc> = models.cloned().collect();
    out.sort_by_key(ModelDoc::sort_key);
    out
}

#[async_trait]
impl Store for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn count_sections(&self) -> Result<u64> {
        Ok(self.inner.read().await.sections.len() as u64)
    }

    async fn insert_sections(&self, sections: &[SectionDoc]) -> Result<usize> {
        self.inner.write().await.sections.extend_from_slice(sections);
        Ok(sections.len())
    }

    async fn list_sections(&self) -> Result<Vec<SectionDoc>> {
        let mut sections = self.inner.read().await.sections.clone();
        sections.sort_by_key(|s| s.index);
        Ok(sections)
    }

    async fn count_models(&self) -> Result<u64> {
        Ok(self.inner.read().await.models.len() as u64)
    }

    async fn insert_models(&self, models: &[ModelDoc]) -> Result<usize> {
        self.inner.write().await.models.extend_from_slice(models);
        Ok(models.len())
    }

    async fn find_models(&self, query: &ModelQuery) -> Result<Vec<ModelDoc>> {
        let guard = self.inner.read().await;
        let mut models = sorted_models(guard.models.iter().filter(|m| query.matches(m)));
        if let Some(limit) = query.limit {
            models.truncate(limit);
        }
        Ok(models)
    }

    async fn find_model(&self, section_slug: &str, model_index: i32) -> Result<Option<ModelDoc>> {
        Ok(self
            .inner
            .read()
            .await
            .models
            .iter()
            .find(|m| m.section_slug == section_slug && m.model_index == model_index)
            .cloned())
    }

    async fn find_models_by_ids(&self, ids: &[String]) -> Result<Vec<ModelDoc>> {
        let guard = self.inner.read().await;
        Ok(sorted_models(guard.models.iter().filter(|m| ids.contains(&m.id))))
    }

    async fn list_journal(&self, limit: usize) -> Result<Vec<JournalEntryDoc>> {
        let mut entries = self.inner.read().await.journal.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn count_journal(&self) -> Result<u64> {
        Ok(self.inner.read().await.journal.len() as u64)
    }

    async fn insert_journal(&self, entry: &JournalEntryDoc) -> Result<()> {
        self.inner.write().await.journal.push(entry.clone());
        Ok(())
    }

    async fn delete_journal(&self, id: &str) -> Result<bool> {
        let mut guard = self.inner.write().await;
        let before = guard.journal.len();
        guard.journal.retain(|e| e.id != id);
        Ok(guard.journal.len() < before)
    }

    async fn start_challenge(&self, challenge: &ChallengeDoc) -> Result<()> {
        let mut guard = self.inner.write().await;
        for existing in guard.challenges.iter_mut() {
            existing.is_active = false;
        }
        guard.challenges.push(challenge.clone());
        Ok(())
    }

    async fn active_challenge(&self) -> Result<Option<ChallengeDoc>> {
        Ok(self
            .inner
            .read()
            .await
            .challenges
            .iter()
            .find(|c| c.is_active)
            .cloned())
    }

    async fn count_challenges(&self) -> Result<u64> {
        Ok(self.inner.read().await.challenges.len() as u64)
    }

    async fn add_completed_day(&self, challenge_id: &str, day: i32) -> Result<()> {
        let mut guard = self.inner.write().await;
        if let Some(challenge) = guard.challenges.iter_mut().find(|c| c.id == challenge_id) {
            challenge.mark_completed(day);
        }
        Ok(())
    }

    async fn insert_challenge_log(&self, log: &ChallengeLogDoc) -> Result<()> {
        self.inner.write().await.challenge_logs.push(log.clone());
        Ok(())
    }

    async fn list_challenge_logs(&self, challenge_id: &str) -> Result<Vec<ChallengeLogDoc>> {
        let mut logs: Vec<ChallengeLogDoc> = self
            .inner
            .read()
            .await
            .challenge_logs
            .iter()
            .filter(|l| l.challenge_id == challenge_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(logs)
    }

    async fn delete_challenge(&self, id: &str) -> Result<bool> {
        let mut guard = self.inner.write().await;
        let before = guard.challenges.len();
        guard.challenges.retain(|c| c.id != id);
        guard.challenge_logs.retain(|l| l.challenge_id != id);
        Ok(guard.challenges.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, section_index: i32, model_index: i32) -> ModelDoc {
        ModelDoc {
            id: id.into(),
            section_index,
            section_slug: format!("s{}", section_index),
            model_index,
            title: format!("Model {}", id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_find_models_orders_and_limits() {
        let store = InMemoryStore::new();
        store
            .insert_models(&[model("c", 2, 1), model("b", 1, 2), model("a", 1, 1)])
            .await
            .unwrap();

        let all = store.find_models(&ModelQuery::all()).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let query = ModelQuery {
            limit: Some(2),
            ..ModelQuery::all()
        };
        assert_eq!(store.find_models(&query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_start_challenge_leaves_one_active() {
        let store = InMemoryStore::new();
        let first = ChallengeDoc::start(&[model("a", 1, 1)]);
        let second = ChallengeDoc::start(&[model("b", 1, 2)]);

        store.start_challenge(&first).await.unwrap();
        store.start_challenge(&second).await.unwrap();

        assert_eq!(store.active_count().await, 1);
        assert_eq!(store.active_challenge().await.unwrap().unwrap().id, second.id);
        assert_eq!(store.count_challenges().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_challenge_removes_logs() {
        let store = InMemoryStore::new();
        let challenge = ChallengeDoc::start(&[model("a", 1, 1)]);
        store.start_challenge(&challenge).await.unwrap();
        store
            .insert_challenge_log(&ChallengeLogDoc::new(&challenge.id, 1, None))
            .await
            .unwrap();

        assert!(store.delete_challenge(&challenge.id).await.unwrap());
        assert!(store.list_challenge_logs(&challenge.id).await.unwrap().is_empty());
        assert!(!store.delete_challenge(&challenge.id).await.unwrap());
    }
}
