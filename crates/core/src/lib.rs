//! Shared building blocks for the alert wizard: error taxonomy, the
//! simplified-parameter key vocabulary, and environment-driven configuration.

pub mod config;
pub mod error;
pub mod keys;

pub use config::{Config, DefaultValues, WizardSettings};
pub use error::*;
