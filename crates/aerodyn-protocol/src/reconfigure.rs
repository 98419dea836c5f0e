use serde::{Deserialize, Serialize};

/// Body of `POST /llm_update`: a free-text instruction for the model factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconfigureRequest {
    pub prompt: String,
}

/// Audit entry the backend attaches when a reconfiguration is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconfigureLog {
    /// Server-side wall clock, `HH:MM:SS`.
    pub time: String,
    /// The operator prompt as received.
    pub request: String,
    /// Human-readable description of the applied change.
    pub change: String,
}

/// Response of `POST /llm_update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconfigureResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<ReconfigureLog>,
}

impl ReconfigureResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The message to surface on a rejected reconfiguration.
    pub fn error_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("reconfiguration rejected (status: {})", self.status))
    }
}
