//! Evaluates parsed `data_attrs` clauses against object data.

use crate::{
    utils::{FilterValue, parse_date},
    validators::data_attrs::{DataAttrClause, Operator},
};
use serde_json::Value;
use std::cmp::Ordering;

/// True when every clause matches `data`.
pub fn matches_all(data: &Value, clauses: &[DataAttrClause]) -> bool {
    clauses.iter().all(|clause| matches_clause(data, clause))
}

fn lookup<'a>(data: &'a Value, clause: &DataAttrClause) -> Option<&'a Value> {
    clause.path().try_fold(data, |value, key| value.get(key))
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ordering(actual: &Value, clause: &DataAttrClause) -> Option<Ordering> {
    match &clause.coerced {
        FilterValue::Number(n) => actual.as_f64()?.partial_cmp(n),
        FilterValue::Date(d) => Some(parse_date(actual.as_str()?)?.cmp(d)),
        FilterValue::Text(_) => None,
    }
}

fn matches_clause(data: &Value, clause: &DataAttrClause) -> bool {
    let Some(actual) = lookup(data, clause) else {
        return false;
    };

    match clause.operator {
        Operator::Exact => match (actual, &clause.coerced) {
            (Value::Number(n), FilterValue::Number(expected)) => n.as_f64() == Some(*expected),
            _ => as_text(actual) == clause.value,
        },
        Operator::IContains => as_text(actual)
            .to_lowercase()
            .contains(&clause.value.to_lowercase()),
        Operator::Gt => ordering(actual, clause).is_some_and(Ordering::is_gt),
        Operator::Gte => ordering(actual, clause).is_some_and(Ordering::is_ge),
        Operator::Lt => ordering(actual, clause).is_some_and(Ordering::is_lt),
        Operator::Lte => ordering(actual, clause).is_some_and(Ordering::is_le),
    }
}
