//! Database schemas for lattice
//!
//! Defines MongoDB document structures for the catalog (sections, models),
//! the journal, and the 30-day challenge with its completion log.

mod challenge;
mod journal;
mod model;
mod section;
pub mod timestamp;

pub use challenge::{ChallengeDoc, ChallengeLogDoc, CHALLENGE_COLLECTION, CHALLENGE_LOG_COLLECTION};
pub use journal::{JournalEntryDoc, JOURNAL_COLLECTION};
pub use model::{ModelDoc, MODEL_COLLECTION};
pub use section::{SectionDoc, SECTION_COLLECTION};
