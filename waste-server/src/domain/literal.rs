//! Parsing of textual literals shared by query strings and imported files.

use chrono::NaiveDate;

/// Parse a boolean literal.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_literals() {
        for s in ["true", "TRUE", "1", "yes", "On"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["false", "False", "0", "no", "OFF"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
        for s in ["", "2", "maybe", "truthy"] {
            assert_eq!(parse_bool(s), None, "{s}");
        }
    }

    #[test]
    fn iso_dates() {
        assert_eq!(
            parse_iso_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_iso_date("2023-02-29"), None);
        assert_eq!(parse_iso_date("29.02.2024"), None);
        assert_eq!(parse_iso_date("tomorrow"), None);
    }
}
