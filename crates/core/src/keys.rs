//! Key vocabulary of the simplified parameter map.
//!
//! These names are persisted and transmitted as plain key/value pairs, so they
//! are part of the external contract and must not change.

pub const THRESHOLD: &str = "threshold";
pub const THRESHOLD_TYPE: &str = "threshold_type";
pub const ADDITIONAL_THRESHOLD: &str = "additional_threshold";
pub const ADDITIONAL_THRESHOLD_TYPE: &str = "additional_threshold_type";
pub const TIME: &str = "time";
pub const GRACE: &str = "grace";
pub const GROUPING_FIELDS: &str = "grouping_fields";
pub const DISTINCTION_FIELDS: &str = "distinction_fields";

// Statistical conditions
pub const TYPE: &str = "type";
pub const FIELD: &str = "field";

// Notification parameters
pub const SEVERITY: &str = "severity";
pub const LOG_BODY: &str = "log_body";
pub const SPLIT_FIELDS: &str = "split_fields";
pub const AGGREGATION_TIME: &str = "aggregation_time";
pub const ALERT_TAG: &str = "alert_tag";
pub const SINGLE_NOTIFICATION: &str = "single_notification";
