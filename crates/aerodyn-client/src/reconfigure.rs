//! State machine for the reconfiguration submit control.

use std::time::{Duration, Instant};

use aerodyn_protocol::ReconfigureLog;

/// How long a terminal phase stays on screen before the control re-arms.
pub const RESET_DELAY: Duration = Duration::from_secs(2);

/// Lifecycle of one prompt submission. The trigger control is disabled in
/// every phase except `Idle`, which rules out double submits.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconfigurePhase {
    Idle,
    Submitting,
    Success { log: Option<ReconfigureLog> },
    Failure { message: String },
}

#[derive(Debug)]
pub struct ReconfigureController {
    phase: ReconfigurePhase,
    reset_at: Option<Instant>,
}

impl Default for ReconfigureController {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconfigureController {
    pub fn new() -> Self {
        Self {
            phase: ReconfigurePhase::Idle,
            reset_at: None,
        }
    }

    pub fn phase(&self) -> &ReconfigurePhase {
        &self.phase
    }

    pub fn can_submit(&self) -> bool {
        self.phase == ReconfigurePhase::Idle
    }

    /// Arm a submission. Refused unless the machine is idle.
    pub fn begin(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.phase = ReconfigurePhase::Submitting;
        self.reset_at = None;
        true
    }

    /// Record an accepted reconfiguration. Only meaningful while submitting.
    pub fn complete_success(&mut self, log: Option<ReconfigureLog>, now: Instant) {
        if self.phase != ReconfigurePhase::Submitting {
            return;
        }
        self.phase = ReconfigurePhase::Success { log };
        self.reset_at = Some(now + RESET_DELAY);
    }

    /// Record a rejected or failed reconfiguration. No retry is scheduled;
    /// the message is surfaced until the timed reset.
    pub fn complete_failure(&mut self, message: String, now: Instant) {
        if self.phase != ReconfigurePhase::Submitting {
            return;
        }
        self.phase = ReconfigurePhase::Failure { message };
        self.reset_at = Some(now + RESET_DELAY);
    }

    /// Timed transition back to `Idle`. Returns true when the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.reset_at {
            Some(at) if now >= at => {
                self.phase = ReconfigurePhase::Idle;
                self.reset_at = None;
                true
            }
            _ => false,
        }
    }
}
