//! Catalog service
//!
//! Read-only views over sections and models: filtered listing, single
//! lookup, the model of the day and related models.

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::db::{ModelDoc, SectionDoc};
use crate::services::{daily, related};
use crate::store::{ModelQuery, Store};
use crate::types::{LatticeError, Result};

/// Default number of models returned by a listing
pub const DEFAULT_MODEL_LIMIT: i64 = 300;

/// Largest accepted listing limit
pub const MAX_MODEL_LIMIT: i64 = 500;

/// Query parameters accepted by the model listing
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ModelListParams {
    pub section: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

impl ModelListParams {
    /// Validate and convert into a store query
    ///
    /// Empty strings count as absent filters.
    pub fn into_query(self) -> Result<ModelQuery> {
        let limit = self.limit.unwrap_or(DEFAULT_MODEL_LIMIT);
        if !(1..=MAX_MODEL_LIMIT).contains(&limit) {
            return Err(LatticeError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_MODEL_LIMIT
            )));
        }

        Ok(ModelQuery {
            section: self.section.filter(|s| !s.is_empty()),
            search: self.search.filter(|s| !s.is_empty()),
            limit: Some(limit as usize),
        })
    }
}

pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn sections(&self) -> Result<Vec<SectionDoc>> {
        self.store.list_sections().await
    }

    pub async fn models(&self, params: ModelListParams) -> Result<Vec<ModelDoc>> {
        let query = params.into_query()?;
        let models = self.store.find_models(&query).await?;
        debug!(
            section = ?query.section,
            search = ?query.search,
            count = models.len(),
            "Model listing"
        );
        Ok(models)
    }

    /// Look up a model by its external address
    pub async fn model(&self, section_slug: &str, model_index: i32) -> Result<ModelDoc> {
        self.store
            .find_model(section_slug, model_index)
            .await?
            .ok_or_else(|| LatticeError::NotFound("Model not found".to_string()))
    }

    /// Model of the day for `date`
    pub async fn daily(&self, date: NaiveDate) -> Result<ModelDoc> {
        let catalog = self.store.find_models(&ModelQuery::all()).await?;
        daily::select_daily(&catalog, date)
            .cloned()
            .ok_or(LatticeError::EmptyCatalog)
    }

    /// Models related to the one at (section_slug, model_index)
    pub async fn related(&self, section_slug: &str, model_index: i32) -> Result<Vec<ModelDoc>> {
        let target = self.model(section_slug, model_index).await?;
        let catalog = self.store.find_models(&ModelQuery::all()).await?;
        Ok(related::related_models(&target, &catalog))
    }
}
