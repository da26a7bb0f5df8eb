//! Rejects geometry for object types that do not allow it.

use super::{ErrorCode, ValidationError, ValidatorError};
use crate::{models::object_type::ObjectType, services::objecttypes::ObjectTypesClient};
use serde_json::Value;
use tracing::warn;

pub const FIELD: &str = "geometry";
pub const MESSAGE: &str = "This object type doesn't support geometry";

/// Null and empty containers count as "no geometry".
fn is_present(geometry: Option<&Value>) -> bool {
    match geometry {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// A missing key allows geometry; any present value is read by truthiness,
/// so `null`, `0` and `""` all disallow it.
fn allows(flag: &Value) -> bool {
    match flag {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Validate the geometry supplied with a write.
///
/// `object_type` is the effective object type (incoming or stored). The
/// object type document is only fetched when geometry is present; fetch
/// failures are not validation errors.
pub async fn validate_geometry(
    client: &ObjectTypesClient,
    object_type: Option<&ObjectType>,
    geometry: Option<&Value>,
) -> Result<(), ValidatorError> {
    if !is_present(geometry) {
        return Ok(());
    }
    let Some(object_type) = object_type else {
        return Ok(());
    };

    let document = client.fetch_object_type(object_type).await.map_err(|err| {
        warn!("fetching object type {} failed: {}", object_type.url, err);
        ValidatorError::ObjectTypeUnavailable(err.to_string())
    })?;

    if !document.get("allowGeometry").is_none_or(allows) {
        return Err(ValidationError::new(FIELD, ErrorCode::GeometryNotAllowed, MESSAGE).into());
    }
    Ok(())
}
