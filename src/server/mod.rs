//! HTTP server for lattice

pub mod cors;
pub mod http;

pub use cors::CorsPolicy;
pub use http::{dispatch, run, AppState};
