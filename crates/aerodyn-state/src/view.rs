//! The dashboard view aggregate: everything the console renders.

use aerodyn_protocol::{SimulationParams, SimulationResponse};

use crate::chart::ChartModel;
use crate::kpi::KpiSummary;
use crate::narrative::{build_narrative, NarrativeLine};
use crate::palette::PaletteSession;

/// All presentation state derived from the latest applied response.
///
/// `apply` is the only mutation path and runs only for a successful,
/// non-stale fetch; a failed request therefore leaves every field exactly
/// as it was.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub palette: PaletteSession,
    pub chart: ChartModel,
    pub kpis: Option<KpiSummary>,
    pub narrative: Vec<NarrativeLine>,
    pub formula: String,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan a response out to the presentation models, in a fixed order:
    /// chart, then KPIs, then narrative, then formula.
    pub fn apply(&mut self, response: &SimulationResponse, params: &SimulationParams) {
        self.chart.apply(response, &mut self.palette);
        if let Some(kpis) = KpiSummary::from_response(response, params) {
            self.kpis = Some(kpis);
        }
        self.narrative = build_narrative(response, params);
        self.formula = response.formula().to_string();

        tracing::debug!(
            revision = self.chart.revision(),
            series = response.series_count(),
            "applied simulation response"
        );
    }

    /// Release a removed variable's color assignment.
    pub fn drop_field(&mut self, key: &str) -> bool {
        self.palette.remove(key)
    }
}
