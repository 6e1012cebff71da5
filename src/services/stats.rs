//! Usage summary

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::challenge::ChallengeView;
use crate::services::streak::CHALLENGE_DAYS;
use crate::store::Store;
use crate::types::Result;

/// Progress of the active challenge
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChallengeProgress {
    pub id: String,
    pub current_day: i32,
    pub streak: i32,
    pub days_completed: usize,
    pub progress_percent: u32,
}

impl From<ChallengeView> for ChallengeProgress {
    fn from(view: ChallengeView) -> Self {
        let days_completed = view.challenge.completed_days.len();
        let progress_percent =
            (days_completed as f64 / CHALLENGE_DAYS as f64 * 100.0).round() as u32;
        Self {
            id: view.challenge.id,
            current_day: view.current_day,
            streak: view.streak,
            days_completed,
            progress_percent,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stats {
    pub total_sections: u64,
    pub total_models: u64,
    pub journal_entries: u64,
    pub challenges_started: u64,
    pub active_challenge: Option<ChallengeProgress>,
}

/// Collect counts across every collection
pub async fn collect(store: &dyn Store, now: DateTime<Utc>) -> Result<Stats> {
    let active_challenge = store
        .active_challenge()
        .await?
        .map(|c| ChallengeProgress::from(ChallengeView::at(c, now)));

    Ok(Stats {
        total_sections: store.count_sections().await?,
        total_models: store.count_models().await?,
        journal_entries: store.count_journal().await?,
        challenges_started: store.count_challenges().await?,
        active_challenge,
    })
}
