//! Templated narrative analysis of a simulation run.

use aerodyn_protocol::{SimulationParams, SimulationResponse};
use serde::Serialize;

use crate::palette::is_base_field;
use crate::normalize::display_name;

/// A reputation sample below this triggers the alert narrative.
pub const LOW_REPUTATION_ALERT: f64 = 50.0;
/// A first-to-last change beyond this magnitude counts as a trend.
pub const TREND_DELTA: f64 = 10.0;

/// How a narrative line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Success,
    Warning,
    Note,
    Info,
}

/// Direction of a dynamic field over the simulated horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Growth,
    Depletion,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Growth => "growth",
            Self::Depletion => "depletion",
            Self::Stable => "stable",
        };
        write!(f, "{s}")
    }
}

/// Classify a series by comparing its final sample to its first.
pub fn classify_trend(points: &[f64]) -> Trend {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Trend::Stable;
    };
    let delta = last - first;
    if delta > TREND_DELTA {
        Trend::Growth
    } else if delta < -TREND_DELTA {
        Trend::Depletion
    } else {
        Trend::Stable
    }
}

/// One sentence of the analysis panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeLine {
    pub severity: Severity,
    pub text: String,
}

impl NarrativeLine {
    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// Build the analysis: one mandatory situation line, a saturation note when
/// the load exceeds capacity, then one trend line per dynamic field.
pub fn build_narrative(
    response: &SimulationResponse,
    params: &SimulationParams,
) -> Vec<NarrativeLine> {
    let mut lines = Vec::new();

    let low_reputation = response
        .series("rep")
        .map(|rep| rep.iter().any(|v| *v < LOW_REPUTATION_ALERT))
        .unwrap_or(false);

    if low_reputation {
        lines.push(NarrativeLine::new(
            Severity::Warning,
            format!(
                "REPUTATION ALERT: current aggressiveness (beta={}) is saturating \
                 the acceptance mechanisms. An automatic regulatory brake is cutting \
                 commercial efficiency.",
                params.beta
            ),
        ));
    } else {
        lines.push(NarrativeLine::new(
            Severity::Success,
            "OPERATIONAL CONTROL: the trajectory matches objectives. Reputational \
             capital sustains stable growth.",
        ));
    }

    let saturated = response
        .series("i")
        .map(|load| {
            load.iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
                > params.capacity as f64
        })
        .unwrap_or(false);

    if saturated {
        lines.push(NarrativeLine::new(
            Severity::Note,
            "NOTE: delivery bottleneck detected. Factory capacity is limiting the \
             conversion of contracts into revenue.",
        ));
    }

    for (key, points) in response.iter_series() {
        if is_base_field(key) {
            continue;
        }
        let trend = classify_trend(points);
        lines.push(NarrativeLine::new(
            Severity::Info,
            format!(
                "{}: {} over the simulated horizon.",
                display_name(key).to_ascii_uppercase(),
                trend
            ),
        ));
    }

    lines
}
