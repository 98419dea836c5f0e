//! In-place chart model rebuilt from each simulation response.

use aerodyn_protocol::SimulationResponse;
use serde::Serialize;

use crate::palette::{is_base_field, PaletteSession, SeriesStyle};

/// One renderable dataset: wire key, display label, style, samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub key: String,
    pub label: String,
    pub style: SeriesStyle,
    pub points: Vec<f64>,
}

/// The single live chart: time-axis labels plus one dataset per dynamic
/// response field. `apply` replaces the dataset list wholesale but mutates
/// the model in place, so renderers can key off `revision` instead of
/// rebuilding their own state from scratch.
#[derive(Debug, Clone, Default)]
pub struct ChartModel {
    labels: Vec<String>,
    datasets: Vec<ChartSeries>,
    revision: u64,
}

impl ChartModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild datasets and labels from a response.
    ///
    /// Every key except `t` and `formula` becomes one dataset. Order is
    /// deterministic: base fields first (r, rep, s, i, when present), then
    /// dynamic fields sorted by key. Labels bucket the time axis by integer
    /// division by 4 (`T0`, `T1`, ...).
    pub fn apply(&mut self, response: &SimulationResponse, palette: &mut PaletteSession) {
        self.labels = response
            .time()
            .iter()
            .map(|v| format!("T{}", (v / 4.0).floor() as i64))
            .collect();

        let mut datasets = Vec::with_capacity(response.series_count());
        for key in ordered_keys(response) {
            let points = match response.series(&key) {
                Some(points) => points.to_vec(),
                None => continue,
            };
            datasets.push(ChartSeries {
                label: palette.label_for(&key),
                style: palette.style_for(&key),
                key,
                points,
            });
        }
        self.datasets = datasets;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn datasets(&self) -> &[ChartSeries] {
        &self.datasets
    }

    /// Bumped once per `apply`; unchanged revision means nothing to redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Min/max over all samples, for axis scaling. None while empty.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for series in &self.datasets {
            for &value in &series.points {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(value), hi.max(value)),
                    None => (value, value),
                });
            }
        }
        bounds
    }
}

/// Base fields in their fixed order, then dynamic fields sorted by key.
fn ordered_keys(response: &SimulationResponse) -> Vec<String> {
    let mut keys = Vec::with_capacity(response.series_count());
    for base in ["r", "rep", "s", "i"] {
        if let Some(actual) = response
            .series_keys()
            .find(|key| key.eq_ignore_ascii_case(base))
        {
            keys.push(actual.to_string());
        }
    }
    for key in response.series_keys() {
        if !is_base_field(key) {
            keys.push(key.to_string());
        }
    }
    keys
}
