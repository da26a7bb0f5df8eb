//! Represents an object record whose `data` conforms to a remote object type.

use crate::validators::{ErrorCode, ValidationError};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub uuid: Uuid,

    /// URL of the object type in its Objecttypes API.
    #[serde(rename = "type")]
    pub object_type: String,

    /// Version of the object type the data was validated against.
    pub type_version: Option<u32>,

    /// Free-form payload, an object by default.
    pub data: Value,

    /// GeoJSON geometry, only accepted when the object type allows it.
    pub geometry: Option<Value>,

    /// Date from which the record is materially valid.
    pub start_at: NaiveDate,

    /// Date the record was registered in this service.
    pub registration_at: NaiveDate,

    /// Revision number, bumped on every update.
    pub index: u32,
}

/// Incoming attributes of a create or update.
///
/// Every field is optional: `None` means the client did not supply it. For
/// `geometry`, `Some(None)` is an explicit `null` and clears the stored value.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPatch {
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub type_version: Option<u32>,
    pub data: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub geometry: Option<Option<Value>>,
    pub start_at: Option<NaiveDate>,
}

/// Keep a present `null` apart from a missing key.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer).map(Some)
}

impl ObjectPatch {
    /// Shape checks that need no remote lookup.
    pub fn check_fields(&self) -> Result<(), ValidationError> {
        if self.type_version == Some(0) {
            return Err(ValidationError::new(
                "typeVersion",
                ErrorCode::MinValue,
                "Ensure this value is greater than or equal to 1.",
            ));
        }
        if let Some(data) = &self.data {
            if !data.is_object() {
                return Err(ValidationError::new(
                    "data",
                    ErrorCode::Invalid,
                    "Expected a JSON object.",
                ));
            }
        }
        Ok(())
    }

    /// The geometry supplied with this write, ignoring an explicit `null`.
    pub fn supplied_geometry(&self) -> Option<&Value> {
        self.geometry.as_ref().and_then(Option::as_ref)
    }
}

pub fn empty_data() -> Value {
    Value::Object(Map::new())
}

impl ObjectRecord {
    /// Build a fresh record from an already validated patch.
    pub fn create(object_type: String, patch: ObjectPatch) -> Self {
        let today = Utc::now().date_naive();
        Self {
            uuid: Uuid::new_v4(),
            object_type,
            type_version: patch.type_version,
            data: patch.data.unwrap_or_else(empty_data),
            geometry: patch.geometry.flatten(),
            start_at: patch.start_at.unwrap_or(today),
            registration_at: today,
            index: 1,
        }
    }

    /// Merge a validated patch into this record and bump its index.
    pub fn apply(&mut self, patch: ObjectPatch) {
        if let Some(object_type) = patch.object_type {
            self.object_type = object_type;
        }
        if let Some(version) = patch.type_version {
            self.type_version = Some(version);
        }
        if let Some(data) = patch.data {
            self.data = data;
        }
        if let Some(geometry) = patch.geometry {
            self.geometry = geometry;
        }
        if let Some(start_at) = patch.start_at {
            self.start_at = start_at;
        }
        self.registration_at = Utc::now().date_naive();
        self.index += 1;
    }
}
