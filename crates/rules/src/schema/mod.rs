//! Serde types on both sides of the wizard mapping.
//!
//! Defines:
//! - `EngineConfig`: the engine's condition configurations, one variant per family
//! - `Expression`: the engine expression tree used by statistical conditions
//! - `LoggingNotificationConfig` / `NotificationDefinition`: logging notifications
//! - `Stream`, `FieldRule`, `AlertRuleStream`: stream matching as shown to users
//! - `AlertRule`, `AlertRuleRequest`, `RuleView`: rule records and the assembled view
//! - `ParameterMap` and its typed views

mod engine;
mod expression;
mod kind;
mod notifications;
mod params;
mod rule;
mod series;
mod stream;

pub use engine::*;
pub use expression::*;
pub use kind::*;
pub use notifications::*;
pub use params::*;
pub use rule::*;
pub use series::*;
pub use stream::*;

#[cfg(test)]
mod tests;
