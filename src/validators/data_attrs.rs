//! Parser for the `data_attrs` query parameter.
//!
//! The parameter is a comma-separated list of `variable__operator__value`
//! clauses. The variable may itself contain `__` to address nested keys, so
//! a clause is split on its last two separators.

use super::{ErrorCode, ValidationError};
use crate::utils::{FilterValue, string_to_value};
use std::{fmt, str::FromStr};

pub const FIELD: &str = "data_attrs";

/// Comparison operators accepted in a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Exact,
    Gt,
    Gte,
    Lt,
    Lte,
    IContains,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Exact,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::IContains,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Exact => "exact",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::IContains => "icontains",
        }
    }

    /// `exact` and `icontains` work on any value, the rest need numbers or dates.
    pub fn accepts_text(self) -> bool {
        matches!(self, Operator::Exact | Operator::IContains)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOperator;

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or(UnknownOperator)
    }
}

/// One validated `variable__operator__value` segment.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAttrClause {
    pub variable: String,
    pub operator: Operator,
    pub value: String,
    /// `value` coerced once at parse time.
    pub coerced: FilterValue,
}

impl DataAttrClause {
    /// Path segments of the variable inside the object data.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.variable.split("__")
    }
}

fn invalid(message: String) -> ValidationError {
    ValidationError::new(FIELD, ErrorCode::InvalidDataAttrsQuery, message)
}

fn parse_clause(raw: &str) -> Result<DataAttrClause, ValidationError> {
    let mut parts = raw.rsplitn(3, "__");
    let (Some(value), Some(operator), Some(variable)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid(format!(
            "`{}` is not a `variable__operator__value` clause",
            raw
        )));
    };

    let operator: Operator = operator
        .parse()
        .map_err(|_| invalid(format!("Comparison operator `{}` is unknown", operator)))?;

    let coerced = string_to_value(value);
    if !operator.accepts_text() && coerced.is_text() {
        return Err(invalid(format!(
            "Operator `{}` supports only dates and/or numeric values",
            operator
        )));
    }

    Ok(DataAttrClause {
        variable: variable.to_string(),
        operator,
        value: value.to_string(),
        coerced,
    })
}

/// Parse every clause, stopping at the first invalid one.
pub fn parse_data_attrs(value: &str) -> Result<Vec<DataAttrClause>, ValidationError> {
    value.split(',').map(parse_clause).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_and_message(value: &str) -> (ErrorCode, String) {
        let err = parse_data_attrs(value).unwrap_err();
        assert_eq!(err.field, FIELD);
        (err.code, err.message)
    }

    #[test]
    fn numeric_comparison_is_valid() {
        let clauses = parse_data_attrs("leeftijd__gt__20").unwrap();
        assert_eq!(
            clauses,
            vec![DataAttrClause {
                variable: "leeftijd".into(),
                operator: Operator::Gt,
                value: "20".into(),
                coerced: FilterValue::Number(20.0),
            }]
        );
    }

    #[test]
    fn unknown_operator_is_named() {
        let (code, message) = code_and_message("naam__unknown__jan");
        assert_eq!(code, ErrorCode::InvalidDataAttrsQuery);
        assert!(message.contains("`unknown`"), "{message}");
    }

    #[test]
    fn clauses_without_two_separators_fail() {
        for raw in ["naam", "naam__jan", "", "leeftijd__gt__20,", "a_b_c"] {
            let (code, _) = code_and_message(raw);
            assert_eq!(code, ErrorCode::InvalidDataAttrsQuery, "{raw}");
        }
    }

    #[test]
    fn ordering_operators_reject_text() {
        for op in ["gt", "gte", "lt", "lte"] {
            let (code, message) = code_and_message(&format!("naam__{op}__jan"));
            assert_eq!(code, ErrorCode::InvalidDataAttrsQuery);
            assert!(message.contains(&format!("`{op}`")), "{message}");
        }
    }

    #[test]
    fn ordering_operators_accept_dates() {
        let clauses = parse_data_attrs("geboortedatum__lte__2000-01-31").unwrap();
        assert_eq!(
            clauses[0].coerced,
            FilterValue::Date(chrono::NaiveDate::from_ymd_opt(2000, 1, 31).unwrap())
        );
    }

    #[test]
    fn exact_and_icontains_accept_text() {
        assert!(parse_data_attrs("naam__exact__jan,naam__icontains__JA").is_ok());
    }

    #[test]
    fn nested_variables_keep_their_separators() {
        let clauses = parse_data_attrs("adres__straat__huisnummer__gte__10").unwrap();
        assert_eq!(clauses[0].variable, "adres__straat__huisnummer");
        assert_eq!(
            clauses[0].path().collect::<Vec<_>>(),
            vec!["adres", "straat", "huisnummer"]
        );
    }

    #[test]
    fn first_bad_clause_wins() {
        let (_, message) = code_and_message("a__exact__1,b__nope__2,c__zzz__3");
        assert!(message.contains("`nope`"));
    }

    #[test]
    fn operator_round_trips_through_display() {
        for op in Operator::ALL {
            assert_eq!(op.to_string().parse::<Operator>(), Ok(op));
        }
        assert_eq!("EXACT".parse::<Operator>(), Err(UnknownOperator));
    }
}
