use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Control ranges of the simulation levers. Values outside these bounds are
/// clamped before a request leaves the client.
pub const S0_RANGE: (u32, u32) = (10, 500);
pub const BETA_RANGE: (f64, f64) = (0.05, 1.0);
pub const SIGMA_RANGE: (f64, f64) = (0.0, 0.9);
pub const CAPACITY_RANGE: (u32, u32) = (5, 100);
pub const GAMMA_RANGE: (f64, f64) = (0.01, 0.3);
pub const T_MAX_RANGE: (u32, u32) = (50, 500);

/// Simulation levers sent to `POST /simulate`.
///
/// Field names on the wire match the legacy backend (`S0`, `beta`, `sigma`,
/// `capacity`, `gamma`, `t_max`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Total addressable market size.
    #[serde(rename = "S0")]
    pub s0: u32,
    /// Commercial aggressiveness.
    pub beta: f64,
    /// Political/regulatory drag.
    pub sigma: f64,
    /// Delivery capacity ceiling.
    pub capacity: u32,
    /// Integration efficiency.
    pub gamma: f64,
    /// Simulation horizon in quarters.
    pub t_max: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            s0: 100,
            beta: 0.4,
            sigma: 0.2,
            capacity: 40,
            gamma: 0.1,
            t_max: 160,
        }
    }
}

impl SimulationParams {
    /// Validate and clamp the levers into their control ranges.
    ///
    /// Non-finite floats are rejected outright rather than clamped; a NaN
    /// must never reach the chart or the KPI thresholds.
    pub fn validated(&self) -> Result<Self, ProtocolError> {
        if !self.beta.is_finite() {
            return Err(ProtocolError::NonFinite("beta"));
        }
        if !self.sigma.is_finite() {
            return Err(ProtocolError::NonFinite("sigma"));
        }
        if !self.gamma.is_finite() {
            return Err(ProtocolError::NonFinite("gamma"));
        }

        Ok(Self {
            s0: self.s0.clamp(S0_RANGE.0, S0_RANGE.1),
            beta: self.beta.clamp(BETA_RANGE.0, BETA_RANGE.1),
            sigma: self.sigma.clamp(SIGMA_RANGE.0, SIGMA_RANGE.1),
            capacity: self.capacity.clamp(CAPACITY_RANGE.0, CAPACITY_RANGE.1),
            gamma: self.gamma.clamp(GAMMA_RANGE.0, GAMMA_RANGE.1),
            t_max: self.t_max.clamp(T_MAX_RANGE.0, T_MAX_RANGE.1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_within_ranges() {
        let params = SimulationParams::default();
        let validated = params.validated().unwrap();
        assert_eq!(params, validated, "defaults must survive validation unchanged");
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let params = SimulationParams {
            s0: 9999,
            beta: 5.0,
            sigma: -1.0,
            capacity: 0,
            gamma: 0.0,
            t_max: 10,
        };
        let validated = params.validated().unwrap();
        assert_eq!(validated.s0, 500);
        assert_eq!(validated.beta, 1.0);
        assert_eq!(validated.sigma, 0.0);
        assert_eq!(validated.capacity, 5);
        assert_eq!(validated.gamma, 0.01);
        assert_eq!(validated.t_max, 50);
    }

    #[test]
    fn test_nan_is_rejected_not_clamped() {
        let params = SimulationParams {
            beta: f64::NAN,
            ..SimulationParams::default()
        };
        assert_eq!(params.validated(), Err(ProtocolError::NonFinite("beta")));

        let params = SimulationParams {
            sigma: f64::INFINITY,
            ..SimulationParams::default()
        };
        assert_eq!(params.validated(), Err(ProtocolError::NonFinite("sigma")));
    }

    #[test]
    fn test_wire_field_names_match_legacy_backend() {
        let json = serde_json::to_value(SimulationParams::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["S0", "beta", "sigma", "capacity", "gamma", "t_max"] {
            assert!(obj.contains_key(key), "missing wire field {key}");
        }
    }
}
