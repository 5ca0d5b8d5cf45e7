//! Core types and utilities for the layered predator-prey grid simulation.

pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use config::*;
pub use error::{Error, Result};
pub use random::Exponential;
pub use types::*;
