//! Translation layer between simplified alert rule parameters and the
//! engine's condition and notification configurations.
//!
//! This crate provides:
//! - Expression builder for statistical threshold trees
//! - Parameter codec decoding engine configurations back to parameter maps
//! - Condition factory building engine configurations from parameters
//! - Rule assembly service combining stores into user-facing rule views
//! - In-memory and file-fixture collaborators for offline use

pub mod codec;
pub mod expression;
pub mod factory;
pub mod fixture;
pub mod memory;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;

pub use factory::ConditionFactory;
pub use service::{Collaborators, DefinitionIds, RuleAssemblyService};
