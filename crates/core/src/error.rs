use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    /// The client-supplied rule or parameter set was rejected.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A referenced stream, condition or notification does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Unsupported comparison operator: '{0}'")]
    UnsupportedOperator(String),

    #[error("Unsupported aggregation function: '{0}'")]
    UnsupportedFunction(String),

    /// An engine-side object could not be interpreted.
    #[error("Decode anomaly: {0}")]
    DecodeAnomaly(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl WizardError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        WizardError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Errors caused by what the caller sent, as opposed to backend failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WizardError::InvalidRequest(_)
                | WizardError::NotFound { .. }
                | WizardError::UnsupportedOperator(_)
                | WizardError::UnsupportedFunction(_)
        )
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(e: serde_json::Error) -> Self {
        WizardError::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(WizardError::InvalidRequest("x".into()).is_client_error());
        assert!(WizardError::not_found("Stream", "s1").is_client_error());
        assert!(WizardError::UnsupportedOperator("!=".into()).is_client_error());
        assert!(WizardError::UnsupportedFunction("MEDIAN".into()).is_client_error());
        assert!(!WizardError::Storage("down".into()).is_client_error());
        assert!(!WizardError::DecodeAnomaly("bad".into()).is_client_error());
    }

    #[test]
    fn not_found_message_names_kind_and_id() {
        let err = WizardError::not_found("Notification", "n-42");
        assert_eq!(err.to_string(), "Notification not found: n-42");
    }
}
