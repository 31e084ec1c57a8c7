use chrono::NaiveDateTime;

use crate::constants::DATETIME_FMT;
use crate::error::Result;

/// Parse an instant in the fixed `YYYY-MM-DD HH:MM:SS` wire format.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(s, DATETIME_FMT)?)
}

pub fn format_instant(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

/// Serde helper so wire structs carry typed instants while the JSON stays in
/// the fixed textual format. Use with `#[serde(with = "crate::datetime::serde_fmt")]`.
pub mod serde_fmt {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::constants::DATETIME_FMT;

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(DATETIME_FMT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_FMT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_valid_instant() {
        let dt = parse_instant("2024-07-08 14:05:09").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 7, 8));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 5, 9));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_instant("2024-07-08").is_err());
        assert!(parse_instant("08/07/2024 14:05:09").is_err());
        assert!(parse_instant("").is_err());
        assert!(parse_instant("2024-13-01 00:00:00").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let s = "2024-01-31 23:59:59";
        assert_eq!(format_instant(&parse_instant(s).unwrap()), s);
    }
}
