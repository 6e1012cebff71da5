//! MongoDB-backed store

use async_trait::async_trait;
use bson::{doc, Document};
use mongodb::options::FindOptions;
use tracing::{debug, info};

use crate::db::schemas::{
    CHALLENGE_COLLECTION, CHALLENGE_LOG_COLLECTION, JOURNAL_COLLECTION, MODEL_COLLECTION,
    SECTION_COLLECTION,
};
use crate::db::{
    ChallengeDoc, ChallengeLogDoc, JournalEntryDoc, ModelDoc, MongoClient, MongoCollection,
    SectionDoc,
};
use crate::store::{ModelQuery, Store};
use crate::types::Result;

/// Store over the five lattice collections
pub struct MongoStore {
    client: MongoClient,
    sections: MongoCollection<SectionDoc>,
    models: MongoCollection<ModelDoc>,
    journal: MongoCollection<JournalEntryDoc>,
    challenges: MongoCollection<ChallengeDoc>,
    challenge_logs: MongoCollection<ChallengeLogDoc>,
}

impl MongoStore {
    /// Open every collection and make sure its indexes exist
    pub async fn new(client: MongoClient) -> Result<Self> {
        let sections = client.collection(SECTION_COLLECTION).await?;
        let models = client.collection(MODEL_COLLECTION).await?;
        let journal = client.collection(JOURNAL_COLLECTION).await?;
        let challenges = client.collection(CHALLENGE_COLLECTION).await?;
        let challenge_logs = client.collection(CHALLENGE_LOG_COLLECTION).await?;

        info!("MongoStore ready on database '{}'", client.db_name());

        Ok(Self {
            client,
            sections,
            models,
            journal,
            challenges,
            challenge_logs,
        })
    }
}

/// Build the Mongo filter for a model query
fn model_filter(query: &ModelQuery) -> Document {
    let mut filter = Document::new();

    if let Some(ref section) = query.section {
        filter.insert("section_slug", section.clone());
    }

    if let Some(ref search) = query.search {
        // Search terms are literal text, not patterns
        let pattern = regex::escape(search);
        filter.insert(
            "$or",
            vec![
                doc! { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "explanation": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "example": { "$regex": pattern.as_str(), "$options": "i" } },
            ],
        );
    }

    filter
}

fn catalog_order() -> Document {
    doc! { "section_index": 1, "model_index": 1 }
}

#[async_trait]
impl Store for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.client.ping().await
    }

    async fn count_sections(&self) -> Result<u64> {
        self.sections.count(doc! {}).await
    }

    async fn insert_sections(&self, sections: &[SectionDoc]) -> Result<usize> {
        self.sections.insert_many(sections).await
    }

    async fn list_sections(&self) -> Result<Vec<SectionDoc>> {
        let options = FindOptions::builder().sort(doc! { "index": 1 }).build();
        self.sections.find_many(doc! {}, Some(options)).await
    }

    async fn count_models(&self) -> Result<u64> {
        self.models.count(doc! {}).await
    }

    async fn insert_models(&self, models: &[ModelDoc]) -> Result<usize> {
        self.models.insert_many(models).await
    }

    async fn find_models(&self, query: &ModelQuery) -> Result<Vec<ModelDoc>> {
        let filter = model_filter(query);
        debug!(?filter, limit = ?query.limit, "Model query");

        let options = FindOptions::builder()
            .sort(catalog_order())
            .limit(query.limit.map(|l| l as i64))
            .build();

        self.models.find_many(filter, Some(options)).await
    }

    async fn find_model(&self, section_slug: &str, model_index: i32) -> Result<Option<ModelDoc>> {
        self.models
            .find_one(doc! { "section_slug": section_slug, "model_index": model_index })
            .await
    }

    async fn find_models_by_ids(&self, ids: &[String]) -> Result<Vec<ModelDoc>> {
        let options = FindOptions::builder().sort(catalog_order()).build();
        self.models
            .find_many(doc! { "id": { "$in": ids.to_vec() } }, Some(options))
            .await
    }

    async fn list_journal(&self, limit: usize) -> Result<Vec<JournalEntryDoc>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit as i64)
            .build();
        self.journal.find_many(doc! {}, Some(options)).await
    }

    async fn count_journal(&self) -> Result<u64> {
        self.journal.count(doc! {}).await
    }

    async fn insert_journal(&self, entry: &JournalEntryDoc) -> Result<()> {
        self.journal.insert_one(entry).await
    }

    async fn delete_journal(&self, id: &str) -> Result<bool> {
        Ok(self.journal.delete_one(doc! { "id": id }).await? > 0)
    }

    async fn start_challenge(&self, challenge: &ChallengeDoc) -> Result<()> {
        // The partial unique index on is_active rejects a racing second
        // insert with a Conflict rather than leaving two active challenges.
        let deactivated = self
            .challenges
            .update_many(
                doc! { "is_active": true },
                doc! { "$set": { "is_active": false } },
            )
            .await?;

        if deactivated.modified_count > 0 {
            debug!(count = deactivated.modified_count, "Deactivated previous challenge");
        }

        self.challenges.insert_one(challenge).await
    }

    async fn active_challenge(&self) -> Result<Option<ChallengeDoc>> {
        self.challenges.find_one(doc! { "is_active": true }).await
    }

    async fn count_challenges(&self) -> Result<u64> {
        self.challenges.count(doc! {}).await
    }

    async fn add_completed_day(&self, challenge_id: &str, day: i32) -> Result<()> {
        self.challenges
            .update_one(
                doc! { "id": challenge_id },
                doc! { "$addToSet": { "completed_days": day } },
            )
            .await?;
        Ok(())
    }

    async fn insert_challenge_log(&self, log: &ChallengeLogDoc) -> Result<()> {
        self.challenge_logs.insert_one(log).await
    }

    async fn list_challenge_logs(&self, challenge_id: &str) -> Result<Vec<ChallengeLogDoc>> {
        let options = FindOptions::builder()
            .sort(doc! { "completed_at": -1 })
            .build();
        self.challenge_logs
            .find_many(doc! { "challenge_id": challenge_id }, Some(options))
            .await
    }

    async fn delete_challenge(&self, id: &str) -> Result<bool> {
        let removed = self.challenges.delete_one(doc! { "id": id }).await?;
        let logs = self
            .challenge_logs
            .delete_many(doc! { "challenge_id": id })
            .await?;
        debug!(challenge_id = id, removed, logs, "Challenge deleted");
        Ok(removed > 0)
    }
}
