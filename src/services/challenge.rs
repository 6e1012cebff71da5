//! 30-day challenge tracker
//!
//! One challenge at a time is active. Starting a new one retires the
//! previous challenge without deleting it. Day numbers and streaks are
//! derived from `started_at` and `completed_days` on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::db::{ChallengeDoc, ChallengeLogDoc};
use crate::services::streak;
use crate::store::Store;
use crate::types::{LatticeError, Result};

/// Number of models a challenge is built from
pub const CHALLENGE_MODELS: usize = 5;

/// Body of a challenge creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChallenge {
    pub model_ids: Vec<String>,
}

/// Body of a day completion request
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteDay {
    pub day: i64,
    #[serde(default)]
    pub reflection: Option<String>,
}

/// Query parameters for the log listing
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LogParams {
    pub challenge_id: Option<String>,
}

/// Challenge as returned to clients, with derived progress
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: ChallengeDoc,
    pub current_day: i32,
    pub streak: i32,
}

impl ChallengeView {
    pub fn at(challenge: ChallengeDoc, now: DateTime<Utc>) -> Self {
        let current_day = streak::current_day(challenge.started_at, now);
        let streak = streak::streak(&challenge.completed_days, current_day);
        Self {
            challenge,
            current_day,
            streak,
        }
    }
}

pub struct ChallengeService {
    store: Arc<dyn Store>,
}

impl ChallengeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Start a challenge over exactly five distinct, existing models
    ///
    /// Models keep the order they were given in.
    pub async fn create(&self, request: CreateChallenge, now: DateTime<Utc>) -> Result<ChallengeView> {
        let ids = request.model_ids;
        if ids.len() != CHALLENGE_MODELS {
            return Err(LatticeError::InvalidInput(format!(
                "A challenge needs exactly {} models, got {}",
                CHALLENGE_MODELS,
                ids.len()
            )));
        }

        let distinct: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if distinct.len() != ids.len() {
            return Err(LatticeError::InvalidInput(
                "Challenge models must be distinct".to_string(),
            ));
        }

        let found = self.store.find_models_by_ids(&ids).await?;
        let mut ordered = Vec::with_capacity(ids.len());
        for id in &ids {
            match found.iter().find(|m| &m.id == id) {
                Some(model) => ordered.push(model.clone()),
                None => {
                    return Err(LatticeError::InvalidInput(format!("Unknown model id '{}'", id)))
                }
            }
        }

        let challenge = ChallengeDoc::start(&ordered);
        self.store.start_challenge(&challenge).await?;
        info!(challenge_id = %challenge.id, "Challenge started");

        Ok(ChallengeView::at(challenge, now))
    }

    /// The active challenge, if any
    pub async fn active(&self, now: DateTime<Utc>) -> Result<Option<ChallengeView>> {
        Ok(self
            .store
            .active_challenge()
            .await?
            .map(|c| ChallengeView::at(c, now)))
    }

    /// Mark a day of the active challenge complete and log it
    ///
    /// Completing a day again only appends another log row.
    pub async fn complete_day(&self, request: CompleteDay, now: DateTime<Utc>) -> Result<ChallengeView> {
        if !streak::is_valid_day(request.day) {
            return Err(LatticeError::InvalidInput(format!(
                "Day must be between 1 and {}",
                streak::CHALLENGE_DAYS
            )));
        }
        let day = request.day as i32;

        let mut challenge = self
            .store
            .active_challenge()
            .await?
            .ok_or_else(|| LatticeError::NotFound("No active challenge".to_string()))?;

        let reflection = request
            .reflection
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        self.store.add_completed_day(&challenge.id, day).await?;
        self.store
            .insert_challenge_log(&ChallengeLogDoc::new(&challenge.id, day, reflection))
            .await?;

        if challenge.mark_completed(day) {
            info!(challenge_id = %challenge.id, day, "Challenge day completed");
        }

        Ok(ChallengeView::at(challenge, now))
    }

    /// Logs of one challenge, or of the active one when no id is given
    pub async fn logs(&self, params: LogParams) -> Result<Vec<ChallengeLogDoc>> {
        let challenge_id = match params.challenge_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => match self.store.active_challenge().await? {
                Some(active) => active.id,
                None => return Ok(Vec::new()),
            },
        };
        self.store.list_challenge_logs(&challenge_id).await
    }

    /// Delete a challenge and its logs, active or not
    pub async fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete_challenge(id).await? {
            info!(challenge_id = id, "Challenge deleted");
            Ok(())
        } else {
            Err(LatticeError::NotFound("Challenge not found".to_string()))
        }
    }
}
