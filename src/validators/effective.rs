//! Effective values: what a write will look like once applied.

use crate::models::object::{ObjectPatch, ObjectRecord, empty_data};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveObject {
    pub object_type: Option<String>,
    pub version: Option<u32>,
    pub data: Value,
}

/// Merge a patch over the existing record; on create the patch stands alone.
pub fn resolve_effective(patch: &ObjectPatch, existing: Option<&ObjectRecord>) -> EffectiveObject {
    match existing {
        None => EffectiveObject {
            object_type: patch.object_type.clone(),
            version: patch.type_version,
            data: patch.data.clone().unwrap_or_else(empty_data),
        },
        Some(record) => EffectiveObject {
            object_type: Some(
                patch
                    .object_type
                    .clone()
                    .unwrap_or_else(|| record.object_type.clone()),
            ),
            version: patch.type_version.or(record.type_version),
            data: patch.data.clone().unwrap_or_else(|| record.data.clone()),
        },
    }
}
