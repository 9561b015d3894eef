//! Deserializers for fields the API sends inconsistently: numeric columns
//! arrive as JSON numbers or as decimal strings, and nullable columns may be
//! missing, `null` or empty.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Required number; `null` reads as zero, unparsable text is an error.
pub fn f64_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("expected a number or numeric string")),
    }
}

/// Optional number; anything that does not parse reads as absent.
pub fn opt_f64_or_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Number(f64),
}

/// Optional free text that is sometimes sent as a number (phone numbers).
/// Empty strings read as absent.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<TextOrNumber>::deserialize(deserializer)? {
        None => None,
        Some(TextOrNumber::Text(s)) => Some(s),
        Some(TextOrNumber::Integer(n)) => Some(n.to_string()),
        Some(TextOrNumber::Number(n)) => Some(n.to_string()),
    };
    Ok(text.filter(|s| !s.trim().is_empty()))
}

/// Parse the calendar date at the start of an ISO date or timestamp string.
pub fn date_prefix(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let prefix = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "f64_or_text")]
        budget: f64,
        #[serde(default, deserialize_with = "opt_f64_or_text")]
        latitude: Option<f64>,
        #[serde(default, deserialize_with = "opt_text")]
        number: Option<String>,
    }

    #[test]
    fn numbers_arrive_as_text_or_json_numbers() {
        let row: Row =
            serde_json::from_str(r#"{"budget":"1500000000.00","latitude":43.65,"number":4165550100}"#)
                .unwrap();
        assert_eq!(row.budget, 1.5e9);
        assert_eq!(row.latitude, Some(43.65));
        assert_eq!(row.number.as_deref(), Some("4165550100"));
    }

    #[test]
    fn missing_or_null_fields_read_as_absent() {
        let row: Row = serde_json::from_str(r#"{"budget":null,"latitude":null,"number":""}"#).unwrap();
        assert_eq!(row.budget, 0.0);
        assert_eq!(row.latitude, None);
        assert_eq!(row.number, None);

        let row: Row = serde_json::from_str(r#"{"latitude":"not a number"}"#).unwrap();
        assert_eq!(row.latitude, None);
    }

    #[test]
    fn bad_budget_text_is_rejected() {
        assert!(serde_json::from_str::<Row>(r#"{"budget":"lots"}"#).is_err());
    }

    #[test]
    fn date_prefix_accepts_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2023, 4, 18);
        assert_eq!(date_prefix("2023-04-18"), expected);
        assert_eq!(date_prefix("2023-04-18T09:30:00.000Z"), expected);
        assert_eq!(date_prefix("April"), None);
    }
}
