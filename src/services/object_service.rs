//! ObjectService: create, update, list and delete object records.
//!
//! Records are held in memory; every write goes through the validators
//! before it touches the store. The store lock is never held across a call
//! to the Objecttypes API.

use crate::{
    models::{
        object::{ObjectPatch, ObjectRecord},
        object_type::ObjectType,
    },
    services::{filters::matches_all, objecttypes::ObjectTypesClient},
    validators::{
        ErrorCode, ValidationError, ValidatorError,
        data_attrs::parse_data_attrs,
        effective::resolve_effective,
        geometry::validate_geometry,
        immutable::check_immutable,
        schema::validate_json_schema,
    },
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

const TYPE_FIELD: &str = "type";
const MAX_UPDATE_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("object `{0}` not found")]
    ObjectNotFound(Uuid),
    #[error("object `{0}` kept changing during validation, retry the update")]
    Conflict(Uuid),
    #[error("Object type can not be retrieved: {0}")]
    ObjectTypeUnavailable(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl From<ValidatorError> for ServiceError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::Invalid(err) => ServiceError::Validation(err),
            ValidatorError::ObjectTypeUnavailable(msg) => ServiceError::ObjectTypeUnavailable(msg),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// How an update treats fields missing from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PUT: `type` must be supplied.
    Full,
    /// PATCH: anything may be left out.
    Partial,
}

#[derive(Clone)]
pub struct ObjectService {
    store: Arc<RwLock<HashMap<Uuid, ObjectRecord>>>,
    pub objecttypes: ObjectTypesClient,
}

impl ObjectService {
    pub fn new(objecttypes: ObjectTypesClient) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            objecttypes,
        }
    }

    fn resolve_object_type(&self, url: &str) -> ServiceResult<ObjectType> {
        self.objecttypes.resolve(url).ok_or_else(|| {
            ValidationError::new(
                TYPE_FIELD,
                ErrorCode::DoesNotExist,
                format!("Object type with url `{}` is not known to this service", url),
            )
            .into()
        })
    }

    /// Run field checks, then the schema validator, then the geometry validator.
    async fn validate(&self, patch: &ObjectPatch, existing: Option<&ObjectRecord>) -> ServiceResult<()> {
        patch.check_fields()?;
        if let Some(object_type) = &patch.object_type {
            let existing_json = existing.map(serde_json::to_value).transpose()?;
            check_immutable(
                &Value::String(object_type.clone()),
                existing_json.as_ref(),
                &[TYPE_FIELD],
            )?;
        }

        let effective = resolve_effective(patch, existing);
        let object_type = effective
            .object_type
            .as_deref()
            .map(|url| self.resolve_object_type(url))
            .transpose()?;

        validate_json_schema(&self.objecttypes, object_type.as_ref(), &effective).await?;
        validate_geometry(&self.objecttypes, object_type.as_ref(), patch.supplied_geometry()).await?;
        Ok(())
    }

    pub async fn create_object(&self, patch: ObjectPatch) -> ServiceResult<ObjectRecord> {
        let Some(object_type) = patch.object_type.clone() else {
            return Err(ValidationError::required(TYPE_FIELD).into());
        };

        self.validate(&patch, None).await?;

        let record = ObjectRecord::create(object_type, patch);
        self.store
            .write()
            .await
            .insert(record.uuid, record.clone());

        info!("created object {} of type {}", record.uuid, record.object_type);
        Ok(record)
    }

    pub async fn get_object(&self, uuid: Uuid) -> ServiceResult<ObjectRecord> {
        self.store
            .read()
            .await
            .get(&uuid)
            .cloned()
            .ok_or(ServiceError::ObjectNotFound(uuid))
    }

    pub async fn update_object(
        &self,
        uuid: Uuid,
        patch: ObjectPatch,
        mode: UpdateMode,
    ) -> ServiceResult<ObjectRecord> {
        if mode == UpdateMode::Full && patch.object_type.is_none() {
            return Err(ValidationError::required(TYPE_FIELD).into());
        }

        // Validation awaits remote calls, so the record may move on meanwhile.
        // Only apply when it is still the revision that was validated.
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let existing = self.get_object(uuid).await?;
            self.validate(&patch, Some(&existing)).await?;

            let mut store = self.store.write().await;
            let record = store
                .get_mut(&uuid)
                .ok_or(ServiceError::ObjectNotFound(uuid))?;
            if record.index != existing.index {
                debug!(
                    "object {} changed from index {} to {} during validation, revalidating",
                    uuid, existing.index, record.index
                );
                continue;
            }
            record.apply(patch);

            info!("updated object {} to index {}", uuid, record.index);
            return Ok(record.clone());
        }

        Err(ServiceError::Conflict(uuid))
    }

    pub async fn delete_object(&self, uuid: Uuid) -> ServiceResult<()> {
        if self.store.write().await.remove(&uuid).is_none() {
            return Err(ServiceError::ObjectNotFound(uuid));
        }
        info!("deleted object {}", uuid);
        Ok(())
    }

    /// List records, optionally filtered by a `data_attrs` query.
    ///
    /// Results are ordered by registration date, then uuid, so pages are stable.
    pub async fn list_objects(&self, data_attrs: Option<&str>) -> ServiceResult<Vec<ObjectRecord>> {
        let clauses = match data_attrs {
            Some(query) if !query.is_empty() => parse_data_attrs(query)?,
            _ => Vec::new(),
        };
        debug!("listing objects with {} data_attrs clauses", clauses.len());

        let mut records: Vec<ObjectRecord> = self
            .store
            .read()
            .await
            .values()
            .filter(|record| matches_all(&record.data, &clauses))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.registration_at
                .cmp(&b.registration_at)
                .then(a.uuid.cmp(&b.uuid))
        });
        Ok(records)
    }
}
