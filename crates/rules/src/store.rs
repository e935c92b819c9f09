//! Collaborator interfaces the wizard reads from and writes to.
//!
//! Implementations own persistence; the wizard only calls them in sequence
//! within one request and never caches what they return.

use chrono::{DateTime, Utc};

use wizard_core::Result;

use crate::schema::{AlertRecord, AlertRuleRequest, EventDefinition, NotificationDefinition, Stream};

/// Validation of incoming alert rule requests.
pub trait RuleStore: Send + Sync {
    fn is_valid_request(&self, request: &AlertRuleRequest) -> bool;
}

pub trait StreamStore: Send + Sync {
    /// Load a stream with its matching rules. Missing streams are `NotFound`.
    fn load(&self, stream_id: &str) -> Result<Stream>;
}

pub trait AlertHistoryStore: Send + Sync {
    /// Alerts raised on `stream_id` at or after `since`, at most `limit` of them.
    fn load_recent(
        &self,
        stream_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AlertRecord>>;
}

/// Storage of condition (event) definitions.
pub trait ConditionDefinitionStore: Send + Sync {
    fn get(&self, id: &str) -> Result<EventDefinition>;
    /// Persist a new definition and return its id.
    fn create(&self, definition: EventDefinition) -> Result<String>;
    fn update(&self, definition: EventDefinition) -> Result<()>;
}

pub trait NotificationDefinitionStore: Send + Sync {
    fn get(&self, id: &str) -> Result<NotificationDefinition>;
    /// Persist a new definition and return its id.
    fn create(&self, definition: NotificationDefinition) -> Result<String>;
    fn update(&self, definition: NotificationDefinition) -> Result<()>;
}
