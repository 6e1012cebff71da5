//! Services layer for lattice
//!
//! Business logic sitting between the HTTP routes and the [`Store`]:
//!
//! - **Catalog**: section and model listings, lookups, daily and related models
//! - **Journal**: personal notes, newest first
//! - **Challenge**: the 30-day challenge tracker
//! - **Stats**: usage summary across collections
//! - **Seed**: idempotent startup seeding
//!
//! `daily`, `related` and `streak` are pure functions over snapshots.
//!
//! [`Store`]: crate::store::Store

pub mod catalog;
pub mod challenge;
pub mod daily;
pub mod journal;
pub mod related;
pub mod seed;
pub mod stats;
pub mod streak;

pub use catalog::{CatalogService, ModelListParams};
pub use challenge::{ChallengeService, ChallengeView, CompleteDay, CreateChallenge, LogParams};
pub use journal::{CreateJournalEntry, JournalService};
pub use seed::{seed_catalog, SeedReport};
pub use stats::Stats;
