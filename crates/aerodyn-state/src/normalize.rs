//! Variable-name cleanup for display.
//!
//! Simulation fields arrive named after their derivative form (`dRdt`,
//! `newLobbying`). Display names strip that plumbing. The strip order is
//! load-bearing and matches the legacy dashboard exactly: trailing `dt`,
//! then leading `d`, then trailing `_dt`, then leading `new`. Reordering
//! changes the result for keys like `"dtdt"`.

/// Produce the display name for a field key.
///
/// Falls back to the original key when stripping would leave nothing.
/// Non-ASCII keys pass through untouched; wire keys are ASCII identifiers.
pub fn display_name(key: &str) -> String {
    if !key.is_ascii() {
        return key.to_string();
    }

    let mut name = key;

    if name.len() >= 2 && name[name.len() - 2..].eq_ignore_ascii_case("dt") {
        name = &name[..name.len() - 2];
    }
    if let Some(rest) = name.strip_prefix('d') {
        name = rest;
    }
    if name.len() >= 3 && name[name.len() - 3..].eq_ignore_ascii_case("_dt") {
        name = &name[..name.len() - 3];
    }
    if name.len() >= 3 && name[..3].eq_ignore_ascii_case("new") {
        name = &name[3..];
    }

    if name.is_empty() {
        key.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_keys_are_untouched() {
        assert_eq!(display_name("cost"), "cost");
        assert_eq!(display_name("lobbying"), "lobbying");
    }

    #[test]
    fn test_derivative_forms_are_stripped() {
        assert_eq!(display_name("dRdt"), "R");
        assert_eq!(display_name("dLobbyingdt"), "Lobbying");
        assert_eq!(display_name("spend_dt"), "spen");
        assert_eq!(display_name("newMarket"), "Market");
    }

    #[test]
    fn test_strip_order_quirk_is_reproduced() {
        // trailing "dt" first, then leading "d": "dtdt" -> "dt" -> "t"
        assert_eq!(display_name("dtdt"), "t");
    }

    #[test]
    fn test_empty_result_falls_back_to_key() {
        assert_eq!(display_name("d"), "d");
        assert_eq!(display_name("dt"), "dt");
        assert_eq!(display_name("ddt"), "ddt");
    }

    #[test]
    fn test_idempotent_on_display_names() {
        let once = display_name("cost");
        assert_eq!(display_name(&once), once);
    }
}
