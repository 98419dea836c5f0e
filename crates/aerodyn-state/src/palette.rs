//! Session-scoped color and label assignment for chart series.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::display_name;

/// An RGB color token from the dashboard palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SeriesColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS-style `#rrggbb` form, used in logs and tests.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Display style for one series: its color and whether the area under the
/// curve is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: SeriesColor,
    pub fill: bool,
}

const GREEN: SeriesColor = SeriesColor::rgb(0x10, 0xb9, 0x81);
const AMBER: SeriesColor = SeriesColor::rgb(0xf5, 0x9e, 0x0b);
const BLUE: SeriesColor = SeriesColor::rgb(0x3b, 0x82, 0xf6);
const RED: SeriesColor = SeriesColor::rgb(0xef, 0x44, 0x44);

/// The four base fields with fixed semantics, color and label.
/// Matching is case-insensitive; these entries are never reassigned.
const BASE_FIELDS: [(&str, &str, SeriesStyle); 4] = [
    ("r", "REVENUE", SeriesStyle { color: GREEN, fill: true }),
    ("rep", "REPUTATION", SeriesStyle { color: AMBER, fill: false }),
    ("s", "MARKET", SeriesStyle { color: BLUE, fill: false }),
    ("i", "ACTIVE LOAD", SeriesStyle { color: RED, fill: false }),
];

/// Colors handed out to dynamic fields, in assignment-preference order.
/// The last entry doubles as the fallback once every color is in use.
const DYNAMIC_PALETTE: [SeriesColor; 8] = [
    SeriesColor::rgb(0x8b, 0x5c, 0xf6), // purple
    SeriesColor::rgb(0xec, 0x48, 0x99), // pink
    SeriesColor::rgb(0x14, 0xb8, 0xa6), // teal
    SeriesColor::rgb(0x84, 0xcc, 0x16), // lime
    SeriesColor::rgb(0x06, 0xb6, 0xd4), // cyan
    SeriesColor::rgb(0xf9, 0x73, 0x16), // orange
    SeriesColor::rgb(0x63, 0x66, 0xf1), // indigo
    SeriesColor::rgb(0x94, 0xa3, 0xb8), // slate
];

/// True for the four reserved base fields (`r`, `rep`, `s`, `i`).
pub fn is_base_field(key: &str) -> bool {
    BASE_FIELDS
        .iter()
        .any(|(base, _, _)| key.eq_ignore_ascii_case(base))
}

/// Color assignments for the dynamic fields seen during one session.
///
/// Passed explicitly into the presentation layer; assignments live exactly
/// as long as the session object, or until `remove` releases one.
#[derive(Debug, Clone, Default)]
pub struct PaletteSession {
    assigned: HashMap<String, SeriesColor>,
}

impl PaletteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the style for a field key.
    ///
    /// Base fields always return their fixed pair. A dynamic field keeps the
    /// color it was first given; an unseen one takes the first palette color
    /// not used by another dynamic field, or the fallback when the palette
    /// is exhausted.
    pub fn style_for(&mut self, key: &str) -> SeriesStyle {
        if let Some((_, _, style)) = BASE_FIELDS
            .iter()
            .find(|(base, _, _)| key.eq_ignore_ascii_case(base))
        {
            return *style;
        }

        let normalized = key.to_ascii_lowercase();
        if let Some(color) = self.assigned.get(&normalized) {
            return SeriesStyle {
                color: *color,
                fill: false,
            };
        }

        let color = DYNAMIC_PALETTE
            .iter()
            .find(|candidate| !self.assigned.values().any(|used| used == *candidate))
            .copied()
            .unwrap_or(DYNAMIC_PALETTE[DYNAMIC_PALETTE.len() - 1]);
        self.assigned.insert(normalized, color);

        SeriesStyle { color, fill: false }
    }

    /// Display label for a field key: fixed for base fields, normalized and
    /// uppercased for dynamic ones.
    pub fn label_for(&self, key: &str) -> String {
        if let Some((_, label, _)) = BASE_FIELDS
            .iter()
            .find(|(base, _, _)| key.eq_ignore_ascii_case(base))
        {
            return (*label).to_string();
        }
        display_name(key).to_ascii_uppercase()
    }

    /// Release a dynamic field's color so a future field can reuse it.
    /// Base fields cannot be released. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.assigned.remove(&key.to_ascii_lowercase()).is_some()
    }

    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_fields_are_case_insensitive() {
        let mut palette = PaletteSession::new();
        assert_eq!(palette.style_for("r"), palette.style_for("R"));
        assert!(palette.style_for("r").fill);
        assert!(!palette.style_for("rep").fill);
        assert_eq!(palette.assigned_count(), 0, "base lookups must not allocate");
    }

    #[test]
    fn test_dynamic_assignment_is_sticky() {
        let mut palette = PaletteSession::new();
        let first = palette.style_for("lobbying");
        let again = palette.style_for("Lobbying");
        assert_eq!(first, again, "assignment is keyed by lowercased name");
    }

    #[test]
    fn test_palette_exhaustion_falls_back() {
        let mut palette = PaletteSession::new();
        for idx in 0..DYNAMIC_PALETTE.len() {
            palette.style_for(&format!("field{idx}"));
        }
        let overflow = palette.style_for("one_too_many");
        assert_eq!(overflow.color, DYNAMIC_PALETTE[DYNAMIC_PALETTE.len() - 1]);
    }

    #[test]
    fn test_removed_color_is_reusable() {
        let mut palette = PaletteSession::new();
        let color = palette.style_for("lobbying").color;
        assert!(palette.remove("LOBBYING"));
        assert!(!palette.remove("lobbying"), "second removal is a no-op");
        let next = palette.style_for("compliance");
        assert_eq!(next.color, color, "freed color is handed out first again");
    }

    #[test]
    fn test_labels() {
        let palette = PaletteSession::new();
        assert_eq!(palette.label_for("rep"), "REPUTATION");
        assert_eq!(palette.label_for("dLobbyingdt"), "LOBBYING");
    }
}
