use std::collections::BTreeMap;

use serde::de::{Deserializer, Error as DeError};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Key carrying the time axis in every simulation payload.
pub const TIME_KEY: &str = "t";
/// Key carrying the display formula in every simulation payload.
pub const FORMULA_KEY: &str = "formula";

/// A parsed `POST /simulate` payload.
///
/// The backend returns a flat JSON object: `t` (time axis), `formula`
/// (display string) and a dynamic set of named series. Fields other than
/// `t` and `formula` can appear or disappear between calls as the model is
/// reconfigured, so the series live in a sorted map rather than a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResponse {
    time: Vec<f64>,
    formula: String,
    series: BTreeMap<String, Vec<f64>>,
}

impl SimulationResponse {
    /// Build a response, enforcing that every series matches the time axis.
    pub fn new(
        time: Vec<f64>,
        formula: String,
        series: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, ProtocolError> {
        for (key, values) in &series {
            if values.len() != time.len() {
                return Err(ProtocolError::LengthMismatch {
                    field: key.clone(),
                    len: values.len(),
                    expected: time.len(),
                });
            }
        }
        Ok(Self {
            time,
            formula,
            series,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Number of samples on the time axis (and in every series).
    pub fn sample_count(&self) -> usize {
        self.time.len()
    }

    /// Look up a single series by its wire key.
    pub fn series(&self, key: &str) -> Option<&[f64]> {
        self.series.get(key).map(Vec::as_slice)
    }

    /// All dynamic series in key order, i.e. every field except `t` and
    /// `formula`.
    pub fn iter_series(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }
}

fn numeric_series(field: &str, value: &serde_json::Value) -> Result<Vec<f64>, ProtocolError> {
    let items = value.as_array().ok_or_else(|| ProtocolError::InvalidSeries {
        field: field.to_string(),
    })?;
    items
        .iter()
        .map(|item| {
            item.as_f64().ok_or_else(|| ProtocolError::InvalidSeries {
                field: field.to_string(),
            })
        })
        .collect()
}

impl<'de> Deserialize<'de> for SimulationResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;

        let time_value = raw
            .get(TIME_KEY)
            .ok_or_else(|| DeError::custom(ProtocolError::MissingField(TIME_KEY)))?;
        let time = numeric_series(TIME_KEY, time_value).map_err(DeError::custom)?;

        let formula = raw
            .get(FORMULA_KEY)
            .ok_or_else(|| DeError::custom(ProtocolError::MissingField(FORMULA_KEY)))?
            .as_str()
            .ok_or_else(|| {
                DeError::custom(ProtocolError::InvalidSeries {
                    field: FORMULA_KEY.to_string(),
                })
            })?
            .to_string();

        let mut series = BTreeMap::new();
        for (key, value) in &raw {
            if key == TIME_KEY || key == FORMULA_KEY {
                continue;
            }
            let values = numeric_series(key, value).map_err(DeError::custom)?;
            series.insert(key.clone(), values);
        }

        SimulationResponse::new(time, formula, series).map_err(DeError::custom)
    }
}

impl Serialize for SimulationResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.series.len() + 2))?;
        map.serialize_entry(TIME_KEY, &self.time)?;
        map.serialize_entry(FORMULA_KEY, &self.formula)?;
        for (key, values) in &self.series {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> &'static str {
        r#"{
            "t": [0.0, 0.8, 1.6, 2.4],
            "formula": "dRdt = gamma_eff * I",
            "r": [0.0, 5.0, 20.0, 60.0],
            "rep": [100.0, 95.0, 80.0, 72.0],
            "s": [100.0, 90.0, 60.0, 30.0],
            "i": [1.0, 6.0, 21.0, 11.0]
        }"#
    }

    #[test]
    fn test_parse_full_payload() {
        let resp: SimulationResponse = serde_json::from_str(payload()).unwrap();
        assert_eq!(resp.sample_count(), 4);
        assert_eq!(resp.formula(), "dRdt = gamma_eff * I");
        assert_eq!(resp.series_count(), 4);
        assert_eq!(resp.series("r").unwrap()[3], 60.0);
    }

    #[test]
    fn test_dynamic_series_exclude_time_and_formula() {
        let resp: SimulationResponse = serde_json::from_str(payload()).unwrap();
        let keys: Vec<&str> = resp.series_keys().collect();
        assert!(!keys.contains(&"t"));
        assert!(!keys.contains(&"formula"));
        assert_eq!(keys, vec!["i", "r", "rep", "s"], "keys are sorted");
    }

    #[test]
    fn test_missing_time_axis_is_rejected() {
        let err = serde_json::from_str::<SimulationResponse>(r#"{"formula": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("missing required field `t`"));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let json = r#"{"t": [0.0, 1.0], "formula": "x", "r": [1.0]}"#;
        let err = serde_json::from_str::<SimulationResponse>(json).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_non_numeric_series_is_rejected() {
        let json = r#"{"t": [0.0], "formula": "x", "r": ["high"]}"#;
        assert!(serde_json::from_str::<SimulationResponse>(json).is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let resp: SimulationResponse = serde_json::from_str(payload()).unwrap();
        let json = serde_json::to_string(&resp).unwrap();
        let restored: SimulationResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, resp);
    }
}
