//! Value coercion shared by the `data_attrs` validator and filter evaluation.

use chrono::NaiveDate;

/// A query value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FilterValue {
    pub fn is_text(&self) -> bool {
        matches!(self, FilterValue::Text(_))
    }
}

/// Numbers win over dates; anything else stays text.
pub fn string_to_value(value: &str) -> FilterValue {
    if let Ok(number) = value.trim().parse::<f64>() {
        return FilterValue::Number(number);
    }
    match parse_date(value) {
        Some(date) => FilterValue::Date(date),
        None => FilterValue::Text(value.to_string()),
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
