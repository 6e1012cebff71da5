//! Startup seeding of the catalog
//!
//! Models and sections are checked independently: each collection is
//! filled only when it is empty, so running the seeder again is a no-op.

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::content::SeedContent;
use crate::db::{ModelDoc, SectionDoc};
use crate::store::Store;
use crate::types::{LatticeError, Result};

/// What a seeding pass wrote
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    pub models_inserted: usize,
    pub sections_inserted: usize,
}

/// Build model documents with fresh ids and their section denormalized
fn model_docs(content: &SeedContent) -> Result<Vec<ModelDoc>> {
    content
        .models
        .iter()
        .map(|m| {
            let section = content.section(m.section_index).ok_or_else(|| {
                LatticeError::Config(format!(
                    "Model '{}' references unknown section {}",
                    m.title, m.section_index
                ))
            })?;
            Ok(ModelDoc {
                id: Uuid::new_v4().to_string(),
                section_index: section.index,
                section_slug: section.slug.clone(),
                section_name: section.short_name.clone(),
                model_index: m.model_index,
                title: m.title.clone(),
                explanation: m.explanation.clone(),
                example: m.example.clone(),
                ai_prompt: m.ai_prompt.clone(),
            })
        })
        .collect()
}

fn section_docs(content: &SeedContent) -> Vec<SectionDoc> {
    content
        .sections
        .iter()
        .map(|s| SectionDoc {
            index: s.index,
            name: s.name.clone(),
            slug: s.slug.clone(),
            short_name: s.short_name.clone(),
            description: s.description.clone(),
            icon: s.icon.clone(),
            model_count: content.model_count(s.index) as i32,
        })
        .collect()
}

/// Fill empty catalog collections from `content`
pub async fn seed_catalog(store: &dyn Store, content: &SeedContent) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if store.count_models().await? == 0 {
        let models = model_docs(content)?;
        report.models_inserted = store.insert_models(&models).await?;
        info!(count = report.models_inserted, "Seeded mental models");
    } else {
        debug!("Models already present, skipping");
    }

    if store.count_sections().await? == 0 {
        let sections = section_docs(content);
        report.sections_inserted = store.insert_sections(&sections).await?;
        info!(count = report.sections_inserted, "Seeded sections");
    } else {
        debug!("Sections already present, skipping");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, ModelQuery};

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = InMemoryStore::new();
        let content = SeedContent::builtin().unwrap();

        let first = seed_catalog(&store, &content).await.unwrap();
        assert_eq!(first.models_inserted, content.models.len());
        assert_eq!(first.sections_inserted, content.sections.len());

        let second = seed_catalog(&store, &content).await.unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(store.count_models().await.unwrap(), content.models.len() as u64);
        assert_eq!(
            store.count_sections().await.unwrap(),
            content.sections.len() as u64
        );
    }

    #[tokio::test]
    async fn test_collections_checked_independently() {
        let store = InMemoryStore::new();
        let content = SeedContent::builtin().unwrap();
        store
            .insert_sections(&section_docs(&content))
            .await
            .unwrap();

        let report = seed_catalog(&store, &content).await.unwrap();
        assert_eq!(report.sections_inserted, 0);
        assert_eq!(report.models_inserted, content.models.len());
    }

    #[tokio::test]
    async fn test_models_denormalize_section() {
        let store = InMemoryStore::new();
        let content = SeedContent::builtin().unwrap();
        seed_catalog(&store, &content).await.unwrap();

        let models = store
            .find_models(&ModelQuery::section("deciding-better"))
            .await
            .unwrap();
        assert!(!models.is_empty());
        assert!(models
            .iter()
            .all(|m| m.section_name == "Deciding Better" && m.section_index == 2));

        let sections = store.list_sections().await.unwrap();
        let deciding = sections.iter().find(|s| s.slug == "deciding-better").unwrap();
        assert_eq!(deciding.model_count as usize, models.len());
    }

    #[test]
    fn test_unknown_section_is_config_error() {
        let mut content = SeedContent::builtin().unwrap();
        content.models[0].section_index = 42;
        assert!(matches!(model_docs(&content), Err(LatticeError::Config(_))));
    }
}
