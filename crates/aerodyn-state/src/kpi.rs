//! Key performance indicators derived from a simulation response.

use aerodyn_protocol::{SimulationParams, SimulationResponse};
use serde::Serialize;

/// Final reputation below this is an immediate alert.
pub const REPUTATION_CRITICAL: f64 = 45.0;
/// Final reputation below this (but above critical) means strain.
pub const REPUTATION_STRAIN: f64 = 70.0;
/// Peak load above `capacity * factor` is an overload alert.
pub const CAPACITY_OVERLOAD_FACTOR: f64 = 1.2;

/// Three-tier risk classification shown on the risk badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Critical,
    UnderStrain,
    Stable,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Critical => "CRITICAL",
            Self::UnderStrain => "UNDER STRAIN",
            Self::Stable => "STABLE",
        };
        write!(f, "{s}")
    }
}

/// Classify risk from the final reputation, the peak load and the capacity
/// lever.
pub fn classify_risk(final_reputation: f64, peak_load: f64, capacity: u32) -> RiskLevel {
    if final_reputation < REPUTATION_CRITICAL
        || peak_load > capacity as f64 * CAPACITY_OVERLOAD_FACTOR
    {
        RiskLevel::Critical
    } else if final_reputation < REPUTATION_STRAIN {
        RiskLevel::UnderStrain
    } else {
        RiskLevel::Stable
    }
}

/// The three scalar indicators plus the risk badge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Last sample of the revenue series, shown as a percentage.
    pub final_success: f64,
    /// Maximum of the load series.
    pub peak_load: f64,
    /// Last sample of the reputation series.
    pub final_reputation: f64,
    pub risk: RiskLevel,
}

impl KpiSummary {
    /// Derive the KPIs from a response.
    ///
    /// Returns None when any of the three required series (`r`, `rep`, `i`)
    /// is missing or empty; a reconfiguration can legitimately remove them,
    /// and the previous KPI strip stays on screen in that case.
    pub fn from_response(
        response: &SimulationResponse,
        params: &SimulationParams,
    ) -> Option<Self> {
        let final_success = *response.series("r")?.last()?;
        let final_reputation = *response.series("rep")?.last()?;
        let load = response.series("i")?;
        if load.is_empty() {
            return None;
        }
        let peak_load = load.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            final_success,
            peak_load,
            final_reputation,
            risk: classify_risk(final_reputation, peak_load, params.capacity),
        })
    }

    pub fn final_success_display(&self) -> String {
        format!("{:.1}%", self.final_success)
    }

    pub fn peak_load_display(&self) -> String {
        format!("{:.1}", self.peak_load)
    }
}
