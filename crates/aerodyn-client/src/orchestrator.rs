//! The update orchestrator: fenced simulation refreshes and single-attempt
//! prompt submissions.

use aerodyn_protocol::{ReconfigureResponse, SimulationParams, SimulationResponse};

use crate::fence::UpdateFence;
use crate::http::{ApiClient, ClientError};

/// Outcome of a fenced refresh that reached the backend.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The response is current; apply it with the params that produced it.
    Applied {
        params: SimulationParams,
        response: SimulationResponse,
    },
    /// A newer request was issued while this one was in flight.
    Stale,
}

/// Drives the simulate/fan-out cycle for the console.
#[derive(Debug)]
pub struct Orchestrator {
    client: ApiClient,
    fence: UpdateFence,
}

impl Orchestrator {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            fence: UpdateFence::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Validate the levers, run one simulation, and fence the response.
    ///
    /// Errors (validation, network, non-2xx, malformed payload) leave all
    /// previously applied presentation state untouched; the caller only
    /// mutates its view on `RefreshOutcome::Applied`.
    pub async fn refresh(
        &self,
        params: &SimulationParams,
    ) -> Result<RefreshOutcome, ClientError> {
        let params = params.validated()?;
        let ticket = self.fence.begin();

        let response = self.client.simulate(&params).await?;

        if !self.fence.try_commit(ticket) {
            tracing::debug!(ticket = ticket.id(), "dropping stale simulation response");
            return Ok(RefreshOutcome::Stale);
        }

        Ok(RefreshOutcome::Applied { params, response })
    }

    /// Submit a reconfiguration prompt. One attempt, no retry.
    pub async fn submit_prompt(
        &self,
        prompt: &str,
    ) -> Result<ReconfigureResponse, ClientError> {
        self.client.reconfigure(prompt).await
    }
}
