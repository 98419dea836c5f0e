//! Typed access to the simulation backend.

use std::time::Duration;

use thiserror::Error;

use aerodyn_protocol::{
    ProtocolError, ReconfigureRequest, ReconfigureResponse, SimulationParams, SimulationResponse,
};

/// Errors surfaced by endpoint calls.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Hard per-request deadline. A hung backend must not leave the console
    /// in a submitting state forever.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: Duration::from_secs(8),
        }
    }
}

/// HTTP client for `POST /simulate` and `POST /llm_update`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one simulation with the given levers.
    pub async fn simulate(
        &self,
        params: &SimulationParams,
    ) -> Result<SimulationResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/simulate", self.base_url))
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Submit a free-text reconfiguration prompt to the model factory.
    pub async fn reconfigure(&self, prompt: &str) -> Result<ReconfigureResponse, ClientError> {
        let body = ReconfigureRequest {
            prompt: prompt.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/llm_update", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
