//! Fields that may be set on create but never changed afterwards.

use super::{ErrorCode, ValidationError};
use serde_json::Value;

pub const MESSAGE: &str = "This field can't be changed";

/// Compare `new_value` with the value at `path` in the existing record's JSON.
///
/// No existing record means a create, which always passes. A path missing
/// from the record compares as `null`.
pub fn check_immutable(
    new_value: &Value,
    existing: Option<&Value>,
    path: &[&str],
) -> Result<(), ValidationError> {
    let Some(existing) = existing else {
        return Ok(());
    };

    let current = path
        .iter()
        .try_fold(existing, |value, key| value.get(key))
        .unwrap_or(&Value::Null);

    if new_value != current {
        return Err(ValidationError::new(
            path.join("."),
            ErrorCode::ImmutableField,
            MESSAGE,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_always_passes() {
        assert!(check_immutable(&json!("anything"), None, &["type"]).is_ok());
    }

    #[test]
    fn unchanged_value_passes() {
        let record = json!({"type": "http://types/1"});
        assert!(check_immutable(&json!("http://types/1"), Some(&record), &["type"]).is_ok());
    }

    #[test]
    fn changed_value_fails() {
        let record = json!({"type": "http://types/1"});
        let err = check_immutable(&json!("http://types/2"), Some(&record), &["type"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImmutableField);
        assert_eq!(err.field, "type");
        assert_eq!(err.message, MESSAGE);
    }

    #[test]
    fn nested_paths_are_followed() {
        let record = json!({"object": {"objectType": "a"}});
        assert!(check_immutable(&json!("a"), Some(&record), &["object", "objectType"]).is_ok());

        let err = check_immutable(&json!("b"), Some(&record), &["object", "objectType"])
            .unwrap_err();
        assert_eq!(err.field, "object.objectType");
    }

    #[test]
    fn missing_path_compares_as_null() {
        let record = json!({});
        assert!(check_immutable(&Value::Null, Some(&record), &["type"]).is_ok());
        assert!(check_immutable(&json!(1), Some(&record), &["type"]).is_err());
    }
}
