use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const END_DATE_FORMAT: &str = "%Y-%m-%d";

/// A tracked subscription. `end_date` keeps the string exactly as entered so
/// that persisting and reloading never rewrites what the user typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub name: String,
    pub end_date: String,
}

impl Subscription {
    pub fn new(name: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            end_date: end_date.into(),
        }
    }

    pub fn parsed_end_date(&self) -> Option<NaiveDate> {
        parse_end_date(&self.end_date)
    }
}

pub fn parse_end_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), END_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_end_date() {
        let sub = Subscription::new("Music", "2024-06-10");
        let json = serde_json::to_string(&sub).unwrap();
        assert_eq!(json, r#"{"name":"Music","endDate":"2024-06-10"}"#);
    }

    #[test]
    fn parses_picker_dates_and_rejects_garbage() {
        assert_eq!(
            parse_end_date(" 2024-02-29 "),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_end_date("2023-02-29").is_none());
        assert!(parse_end_date("next tuesday").is_none());
        assert!(parse_end_date("").is_none());
    }
}
