//! Database layer for lattice
//!
//! MongoDB client, typed collection wrapper and document schemas.

pub mod mongo;
pub mod schemas;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection};
pub use schemas::{ChallengeDoc, ChallengeLogDoc, JournalEntryDoc, ModelDoc, SectionDoc};
