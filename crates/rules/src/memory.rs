//! In-memory collaborators for tests, fixtures and the CLI.
//!
//! Thread-safe via `std::sync::RwLock`. Each store counts the calls that
//! matter to callers (loads for streams, writes for definitions) so tests
//! can assert which collaborator interactions happened.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use wizard_core::{Result, WizardError};

use crate::schema::{
    AlertRecord, AlertRuleRequest, EventDefinition, NotificationDefinition, Stream,
};
use crate::store::{
    AlertHistoryStore, ConditionDefinitionStore, NotificationDefinitionStore, RuleStore,
    StreamStore,
};
use crate::validation::validate_request;

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| WizardError::Storage("memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| WizardError::Storage("memory store lock poisoned".to_string()))
}

// ── Rules ───────────────────────────────────────────────────────────

/// Accepts requests that pass [`validate_request`].
#[derive(Debug, Default)]
pub struct MemoryRuleStore;

impl RuleStore for MemoryRuleStore {
    fn is_valid_request(&self, request: &AlertRuleRequest) -> bool {
        let result = validate_request(request);
        for error in &result.errors {
            tracing::debug!(path = %error.path, message = %error.message, "Rule request rejected");
        }
        result.valid
    }
}

// ── Streams ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStreamStore {
    streams: RwLock<HashMap<String, Stream>>,
    loads: AtomicUsize,
}

impl MemoryStreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, stream: Stream) -> Result<()> {
        write(&self.streams)?.insert(stream.id.clone(), stream);
        Ok(())
    }

    /// Number of `load` calls so far, successful or not.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl StreamStore for MemoryStreamStore {
    fn load(&self, stream_id: &str) -> Result<Stream> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        read(&self.streams)?
            .get(stream_id)
            .cloned()
            .ok_or_else(|| WizardError::not_found("Stream", stream_id))
    }
}

// ── Alert history ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryAlertHistory {
    alerts: RwLock<Vec<AlertRecord>>,
}

impl MemoryAlertHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, alert: AlertRecord) -> Result<()> {
        write(&self.alerts)?.push(alert);
        Ok(())
    }
}

impl AlertHistoryStore for MemoryAlertHistory {
    fn load_recent(
        &self,
        stream_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AlertRecord>> {
        let alerts = read(&self.alerts)?;
        let mut recent: Vec<AlertRecord> = alerts
            .iter()
            .filter(|a| a.stream_id == stream_id && a.triggered_at >= since)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));
        recent.truncate(limit);
        Ok(recent)
    }
}

// ── Condition definitions ───────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryConditionStore {
    definitions: RwLock<HashMap<String, EventDefinition>>,
    writes: AtomicUsize,
}

impl MemoryConditionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `create` and `update` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ConditionDefinitionStore for MemoryConditionStore {
    fn get(&self, id: &str) -> Result<EventDefinition> {
        read(&self.definitions)?
            .get(id)
            .cloned()
            .ok_or_else(|| WizardError::not_found("Condition definition", id))
    }

    fn create(&self, mut definition: EventDefinition) -> Result<String> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = definition
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        definition.id = Some(id.clone());
        write(&self.definitions)?.insert(id.clone(), definition);
        Ok(id)
    }

    fn update(&self, definition: EventDefinition) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = definition.id.clone().ok_or_else(|| {
            WizardError::InvalidRequest("condition definition has no id".to_string())
        })?;
        let mut definitions = write(&self.definitions)?;
        match definitions.get_mut(&id) {
            Some(slot) => {
                *slot = definition;
                Ok(())
            }
            None => Err(WizardError::not_found("Condition definition", id)),
        }
    }
}

// ── Notification definitions ────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    definitions: RwLock<HashMap<String, NotificationDefinition>>,
    writes: AtomicUsize,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `create` and `update` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl NotificationDefinitionStore for MemoryNotificationStore {
    fn get(&self, id: &str) -> Result<NotificationDefinition> {
        read(&self.definitions)?
            .get(id)
            .cloned()
            .ok_or_else(|| WizardError::not_found("Notification definition", id))
    }

    fn create(&self, mut definition: NotificationDefinition) -> Result<String> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = definition
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        definition.id = Some(id.clone());
        write(&self.definitions)?.insert(id.clone(), definition);
        Ok(id)
    }

    fn update(&self, definition: NotificationDefinition) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = definition.id.clone().ok_or_else(|| {
            WizardError::InvalidRequest("notification definition has no id".to_string())
        })?;
        let mut definitions = write(&self.definitions)?;
        match definitions.get_mut(&id) {
            Some(slot) => {
                *slot = definition;
                Ok(())
            }
            None => Err(WizardError::not_found("Notification definition", id)),
        }
    }
}
