//! Static content shipped with lattice
//!
//! The catalog (sections and models) is written to the store once at
//! startup; the introduction and conclusion are served straight from here.
//! The embedded `catalog.json` can be replaced at runtime with `SEED_PATH`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::types::{LatticeError, Result};

const BUILTIN_CATALOG: &str = include_str!("catalog.json");

/// Section as authored in the seed file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedSection {
    pub index: i32,
    pub name: String,
    pub slug: String,
    pub short_name: String,
    pub description: String,
    pub icon: String,
}

/// Model as authored in the seed file (ids are assigned when seeding)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedModel {
    pub section_index: i32,
    pub model_index: i32,
    pub title: String,
    pub explanation: String,
    pub example: String,
    pub ai_prompt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Introduction {
    pub title: String,
    pub dedication: String,
    pub paragraphs: Vec<String>,
    pub how_to_use: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Conclusion {
    pub title: String,
    pub key_takeaways: Vec<String>,
    pub how_to_apply: Vec<String>,
    pub challenge: String,
    pub final_thought: String,
}

/// Everything the service ships with
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedContent {
    pub sections: Vec<SeedSection>,
    pub models: Vec<SeedModel>,
    pub introduction: Introduction,
    pub conclusion: Conclusion,
}

impl SeedContent {
    /// Content embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_CATALOG)
    }

    /// Content loaded from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LatticeError::Config(format!("Cannot read seed file {}: {}", path.display(), e))
        })?;
        Self::parse(&raw)
    }

    /// Load from `path` when given, otherwise the embedded content
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    fn parse(raw: &str) -> Result<Self> {
        let content: Self = serde_json::from_str(raw)
            .map_err(|e| LatticeError::Config(format!("Invalid seed content: {}", e)))?;
        content.validate()?;
        Ok(content)
    }

    /// Check the cross-references the store relies on
    pub fn validate(&self) -> Result<()> {
        let mut indexes = HashSet::new();
        let mut slugs = HashSet::new();
        for section in &self.sections {
            if !indexes.insert(section.index) {
                return Err(LatticeError::Config(format!(
                    "Duplicate section index {}",
                    section.index
                )));
            }
            if !slugs.insert(section.slug.as_str()) {
                return Err(LatticeError::Config(format!(
                    "Duplicate section slug '{}'",
                    section.slug
                )));
            }
        }

        let mut positions = HashSet::new();
        for model in &self.models {
            if !indexes.contains(&model.section_index) {
                return Err(LatticeError::Config(format!(
                    "Model '{}' references unknown section {}",
                    model.title, model.section_index
                )));
            }
            if !positions.insert((model.section_index, model.model_index)) {
                return Err(LatticeError::Config(format!(
                    "Duplicate model index {} in section {}",
                    model.model_index, model.section_index
                )));
            }
        }

        Ok(())
    }

    /// Look up a section by its index
    pub fn section(&self, index: i32) -> Option<&SeedSection> {
        self.sections.iter().find(|s| s.index == index)
    }

    /// Number of models authored for a section
    pub fn model_count(&self, section_index: i32) -> usize {
        self.models
            .iter()
            .filter(|m| m.section_index == section_index)
            .count()
    }
}
