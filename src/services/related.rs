//! Related-model heuristic
//!
//! Approximates topical neighbours by keyword overlap with the target's
//! title. This is a full scan over a catalog snapshot on every call; the
//! catalog is a few hundred rows.

use crate::db::ModelDoc;

/// Upper bound on related results
pub const MAX_RELATED: usize = 5;

/// Below this many keyword matches, same-section models are appended
const MIN_KEYWORD_MATCHES: usize = 3;

/// Keywords checked against candidate titles
const TITLE_KEYWORDS: usize = 3;

/// Keywords checked against candidate explanations
const EXPLANATION_KEYWORDS: usize = 2;

/// Lowercased keywords from a title
///
/// Words longer than three characters; if there are none, the first two
/// words whatever their length.
pub fn title_keywords(title: &str) -> Vec<String> {
    let words: Vec<&str> = title.split_whitespace().collect();

    let long: Vec<String> = words
        .iter()
        .filter(|w| w.chars().count() > 3)
        .map(|w| w.to_lowercase())
        .collect();

    if !long.is_empty() {
        return long;
    }

    words.iter().take(2).map(|w| w.to_lowercase()).collect()
}

/// Models related to `target`, keyword matches first, then same-section padding
///
/// `catalog` should be in catalog order; the result never contains the
/// target and never exceeds [`MAX_RELATED`].
pub fn related_models(target: &ModelDoc, catalog: &[ModelDoc]) -> Vec<ModelDoc> {
    let keywords = title_keywords(&target.title);
    let title_terms = &keywords[..keywords.len().min(TITLE_KEYWORDS)];
    let explanation_terms = &keywords[..keywords.len().min(EXPLANATION_KEYWORDS)];

    let mut related: Vec<ModelDoc> = catalog
        .iter()
        .filter(|m| m.id != target.id)
        .filter(|m| {
            let title = m.title.to_lowercase();
            let explanation = m.explanation.to_lowercase();
            title_terms.iter().any(|k| title.contains(k.as_str()))
                || explanation_terms.iter().any(|k| explanation.contains(k.as_str()))
        })
        .take(MAX_RELATED)
        .cloned()
        .collect();

    if related.len() < MIN_KEYWORD_MATCHES {
        for candidate in catalog
            .iter()
            .filter(|m| m.section_slug == target.section_slug && m.id != target.id)
        {
            if related.len() >= MAX_RELATED {
                break;
            }
            if related.iter().all(|r| r.id != candidate.id) {
                related.push(candidate.clone());
            }
        }
    }

    related
}
