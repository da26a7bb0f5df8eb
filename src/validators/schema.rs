//! Checks object data against the JSON schema of its object type version.

use super::{ErrorCode, ValidationError, effective::EffectiveObject};
use crate::{models::object_type::ObjectType, services::objecttypes::ObjectTypesClient};
use tracing::debug;

/// Validate the effective data of a write.
///
/// `object_type` is the resolved form of `effective.object_type`. Writes
/// without an object type or a version are not checked.
pub async fn validate_json_schema(
    client: &ObjectTypesClient,
    object_type: Option<&ObjectType>,
    effective: &EffectiveObject,
) -> Result<(), ValidationError> {
    let (Some(object_type), Some(version)) = (object_type, effective.version) else {
        debug!("no object type or version, skipping schema check");
        return Ok(());
    };

    client
        .check_object(object_type, version, &effective.data)
        .await
        .map_err(|err| ValidationError::non_field(ErrorCode::InvalidJsonSchema, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{objecttypes_client, spawn_objecttypes, unreachable_api_root};
    use serde_json::json;

    fn effective(url: &str, version: Option<u32>, data: serde_json::Value) -> EffectiveObject {
        EffectiveObject {
            object_type: Some(url.to_string()),
            version,
            data,
        }
    }

    #[tokio::test]
    async fn skips_without_version() {
        // Nothing listens here, so any request would fail.
        let api_root = unreachable_api_root().await;
        let client = objecttypes_client(&api_root);
        let url = format!("{api_root}objecttypes/open");
        let object_type = client.resolve(&url).unwrap();

        let result = validate_json_schema(
            &client,
            Some(&object_type),
            &effective(&url, None, json!({"naam": 1})),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn skips_without_object_type() {
        let api_root = unreachable_api_root().await;
        let client = objecttypes_client(&api_root);
        let effective = EffectiveObject {
            object_type: None,
            version: Some(1),
            data: json!({}),
        };

        assert!(validate_json_schema(&client, None, &effective).await.is_ok());
    }

    #[tokio::test]
    async fn valid_data_passes() {
        let api_root = spawn_objecttypes().await;
        let client = objecttypes_client(&api_root);
        let url = format!("{api_root}objecttypes/open");
        let object_type = client.resolve(&url).unwrap();

        let result = validate_json_schema(
            &client,
            Some(&object_type),
            &effective(&url, Some(1), json!({"naam": "jan", "leeftijd": 20})),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn mismatch_is_tagged() {
        let api_root = spawn_objecttypes().await;
        let client = objecttypes_client(&api_root);
        let url = format!("{api_root}objecttypes/open");
        let object_type = client.resolve(&url).unwrap();

        let err = validate_json_schema(
            &client,
            Some(&object_type),
            &effective(&url, Some(1), json!({"leeftijd": 20})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidJsonSchema);
        assert!(err.message.contains("naam"), "{}", err.message);
    }

    #[tokio::test]
    async fn unreachable_version_is_tagged() {
        let api_root = unreachable_api_root().await;
        let client = objecttypes_client(&api_root);
        let url = format!("{api_root}objecttypes/open");
        let object_type = client.resolve(&url).unwrap();

        let err = validate_json_schema(
            &client,
            Some(&object_type),
            &effective(&url, Some(1), json!({})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidJsonSchema);
        assert!(
            err.message
                .starts_with("Object type version can not be retrieved:")
        );
    }
}
