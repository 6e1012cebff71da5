//! Lattice - mental models reference API
//!
//! Serves a curated catalog of mental models grouped into sections, plus a
//! personal journal and a 30-day practice challenge, over a JSON HTTP API
//! backed by MongoDB.
//!
//! ## Layers
//!
//! - **Routes**: path matching and JSON responses
//! - **Services**: catalog queries, journal, challenge tracking, stats, seeding
//! - **Store**: the persistence seam, MongoDB or in-memory
//! - **Content**: embedded seed catalog, introduction and conclusion

pub mod config;
pub mod content;
pub mod db;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{LatticeError, Result};
