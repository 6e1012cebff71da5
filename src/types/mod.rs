//! Shared types for lattice

pub mod error;

pub use error::{LatticeError, Result};
