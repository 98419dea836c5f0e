//! Presentation-state integration tests.
//! These cover the dataset reconciliation pipeline end-to-end: a raw
//! response in, chart series / KPIs / narrative out.

use std::collections::BTreeMap;

use aerodyn_protocol::{SimulationParams, SimulationResponse};
use aerodyn_state::{
    classify_risk, DashboardView, KpiSummary, PaletteSession, RiskLevel, Severity,
};

fn response(keys: &[&str], len: usize) -> SimulationResponse {
    let time: Vec<f64> = (0..len).map(|i| i as f64 * 0.8).collect();
    let mut series = BTreeMap::new();
    for (idx, key) in keys.iter().enumerate() {
        series.insert(
            key.to_string(),
            (0..len).map(|i| 50.0 + (i + idx) as f64).collect(),
        );
    }
    SimulationResponse::new(time, "dRdt = gamma_eff * I".to_string(), series).unwrap()
}

// ─── Color assignment ────────────────────────────────────────────────────────

#[test]
fn test_reserved_colors_are_stable_regardless_of_call_order() {
    let mut first_lookup = PaletteSession::new();
    let mut late_lookup = PaletteSession::new();

    let direct = first_lookup.style_for("rep");

    // Exhaust the dynamic palette before touching "rep" in the second session.
    for idx in 0..12 {
        late_lookup.style_for(&format!("noise{idx}"));
    }
    let after_noise = late_lookup.style_for("rep");

    assert_eq!(direct, after_noise, "base fields must never be reassigned");
}

#[test]
fn test_dynamic_keys_get_distinct_colors_while_palette_lasts() {
    let mut palette = PaletteSession::new();
    let mut seen = Vec::new();
    for key in ["lobbying", "compliance", "churn", "press"] {
        let color = palette.style_for(key).color;
        assert!(
            !seen.contains(&color),
            "color {} handed out twice",
            color.hex()
        );
        seen.push(color);
    }
}

// ─── Chart reconciliation ────────────────────────────────────────────────────

#[test]
fn test_chart_produces_one_series_per_non_reserved_key() {
    let mut view = DashboardView::new();
    let params = SimulationParams::default();
    let resp = response(&["r", "rep", "s", "i", "foo"], 8);

    view.apply(&resp, &params);

    assert_eq!(view.chart.datasets().len(), 5, "all keys except t and formula");
    assert!(view
        .chart
        .datasets()
        .iter()
        .all(|d| d.points.len() == resp.sample_count()));
    assert_eq!(view.chart.labels().len(), resp.sample_count());
}

#[test]
fn test_reapplying_same_response_is_stable() {
    let mut view = DashboardView::new();
    let params = SimulationParams::default();
    let resp = response(&["r", "rep", "i", "foo", "bar"], 8);

    view.apply(&resp, &params);
    let first: Vec<_> = view.chart.datasets().to_vec();
    let first_revision = view.chart.revision();

    view.apply(&resp, &params);

    assert_eq!(view.chart.datasets(), first.as_slice(), "content is identical");
    assert_eq!(view.chart.revision(), first_revision + 1, "revision still bumps");
}

// ─── KPI thresholds ──────────────────────────────────────────────────────────

#[test]
fn test_final_reputation_30_is_critical() {
    assert_eq!(classify_risk(30.0, 10.0, 40), RiskLevel::Critical);
}

#[test]
fn test_final_reputation_80_is_stable() {
    assert_eq!(classify_risk(80.0, 10.0, 40), RiskLevel::Stable);
}

#[test]
fn test_kpis_survive_a_response_that_lost_its_series() {
    let mut view = DashboardView::new();
    let params = SimulationParams::default();

    view.apply(&response(&["r", "rep", "s", "i"], 8), &params);
    let kpis = view.kpis.expect("full response yields KPIs");

    // A reconfigured model dropped the load series entirely.
    view.apply(&response(&["r", "rep"], 8), &params);
    assert_eq!(
        view.kpis,
        Some(kpis),
        "KPI strip keeps its last complete values"
    );
}

// ─── Narrative ───────────────────────────────────────────────────────────────

#[test]
fn test_narrative_leads_with_situation_then_trends() {
    let mut view = DashboardView::new();
    let params = SimulationParams::default();
    view.apply(&response(&["r", "rep", "i", "lobbying"], 8), &params);

    assert!(!view.narrative.is_empty());
    assert!(matches!(
        view.narrative[0].severity,
        Severity::Success | Severity::Warning
    ));
    assert!(view
        .narrative
        .iter()
        .any(|line| line.text.starts_with("LOBBYING:")));
    assert_eq!(view.formula, "dRdt = gamma_eff * I");
}

// ─── Variable removal ────────────────────────────────────────────────────────

#[test]
fn test_dropping_a_field_releases_its_color() {
    let mut view = DashboardView::new();
    let params = SimulationParams::default();
    view.apply(&response(&["r", "lobbying"], 4), &params);

    let color = view.palette.style_for("lobbying").color;
    assert!(view.drop_field("lobbying"));

    let mut fresh = PaletteSession::new();
    assert_eq!(
        view.palette.style_for("newcomer").color,
        fresh.style_for("anything").color,
        "released color is the first free one again"
    );
    assert_eq!(view.palette.style_for("newcomer").color, color);
}

// ─── KPI derivation from a realistic payload ─────────────────────────────────

#[test]
fn test_kpis_from_wire_payload() {
    let json = r#"{
        "t": [0.0, 40.0, 80.0, 120.0, 160.0],
        "formula": "dRepdt = -0.05 * beta * I + 0.1 * (100 - Rep)",
        "s": [100.0, 70.0, 40.0, 20.0, 10.0],
        "i": [1.0, 25.0, 52.0, 30.0, 12.0],
        "r": [0.0, 10.0, 35.0, 60.0, 78.0],
        "rep": [100.0, 88.0, 71.0, 66.0, 62.0]
    }"#;
    let resp: SimulationResponse = serde_json::from_str(json).unwrap();
    let params = SimulationParams::default(); // capacity 40

    let kpis = KpiSummary::from_response(&resp, &params).unwrap();
    assert_eq!(kpis.final_success, 78.0);
    assert_eq!(kpis.peak_load, 52.0);
    // 52 > 40 * 1.2 -> overload wins even though reputation is only strained
    assert_eq!(kpis.risk, RiskLevel::Critical);
}
