//! Personal journal

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::db::JournalEntryDoc;
use crate::store::Store;
use crate::types::{LatticeError, Result};

/// Most entries returned by a listing
pub const JOURNAL_LIST_LIMIT: usize = 200;

/// Body of a journal creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJournalEntry {
    pub content: String,
    #[serde(default)]
    pub model_title: Option<String>,
    #[serde(default)]
    pub section_slug: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct JournalService {
    store: Arc<dyn Store>,
}

impl JournalService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Newest entries first
    pub async fn list(&self) -> Result<Vec<JournalEntryDoc>> {
        self.store.list_journal(JOURNAL_LIST_LIMIT).await
    }

    pub async fn create(&self, request: CreateJournalEntry) -> Result<JournalEntryDoc> {
        if request.content.trim().is_empty() {
            return Err(LatticeError::InvalidInput(
                "Journal content must not be empty".to_string(),
            ));
        }

        let entry = JournalEntryDoc::new(
            request.content,
            non_blank(request.model_title),
            non_blank(request.section_slug),
        );
        self.store.insert_journal(&entry).await?;
        info!(entry_id = %entry.id, "Journal entry created");
        Ok(entry)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete_journal(id).await? {
            info!(entry_id = id, "Journal entry deleted");
            Ok(())
        } else {
            Err(LatticeError::NotFound("Entry not found".to_string()))
        }
    }
}
