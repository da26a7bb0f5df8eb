//! Client for the remote Objecttypes APIs.
//!
//! Object types live in external services; this client resolves an object
//! type URL to the configured service that owns it, fetches the object type
//! document and checks payloads against the JSON schema of a given version.

use crate::{config::ServiceConfig, models::object_type::ObjectType};
use reqwest::{Client, header::AUTHORIZATION};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ObjectTypesError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("Object type version can not be retrieved: {0}")]
    VersionUnavailable(reqwest::Error),
    #[error("{0} does not appear to be a valid objecttype.")]
    NotAnObjectType(String),
    #[error("Invalid JSON schema: {0}")]
    InvalidSchema(String),
    #[error("{0}")]
    SchemaMismatch(String),
}

pub type ObjectTypesResult<T> = Result<T, ObjectTypesError>;

#[derive(Clone)]
pub struct ObjectTypesClient {
    http: Client,
    services: Arc<Vec<ServiceConfig>>,
}

impl ObjectTypesClient {
    pub fn new(services: Vec<ServiceConfig>, timeout: Duration) -> ObjectTypesResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            services: Arc::new(services),
        })
    }

    pub fn services(&self) -> &[ServiceConfig] {
        &self.services
    }

    /// Find the service whose API root prefixes `url`, preferring the longest root.
    pub fn resolve(&self, url: &str) -> Option<ObjectType> {
        self.services
            .iter()
            .filter(|service| url.starts_with(&service.api_root))
            .max_by_key(|service| service.api_root.len())
            .map(|service| ObjectType {
                url: url.to_string(),
                service: service.clone(),
            })
    }

    async fn get_json(&self, object_type: &ObjectType, url: &str) -> reqwest::Result<Value> {
        debug!("GET {}", url);
        let mut request = self.http.get(url);
        if let Some(token) = &object_type.service.auth_token {
            request = request.header(AUTHORIZATION, format!("Token {}", token));
        }
        request.send().await?.error_for_status()?.json().await
    }

    /// Fetch the object type document itself.
    pub async fn fetch_object_type(&self, object_type: &ObjectType) -> ObjectTypesResult<Value> {
        Ok(self.get_json(object_type, &object_type.url).await?)
    }

    /// Validate `data` against the JSON schema of `version` of the object type.
    pub async fn check_object(
        &self,
        object_type: &ObjectType,
        version: u32,
        data: &Value,
    ) -> ObjectTypesResult<()> {
        let version_data = self
            .get_json(object_type, &object_type.version_url(version))
            .await
            .map_err(ObjectTypesError::VersionUnavailable)?;

        let schema = version_data
            .get("jsonSchema")
            .ok_or_else(|| ObjectTypesError::NotAnObjectType(object_type.versions_url()))?;

        check_against_schema(schema, data)
    }
}

/// Compile `schema` and report the first error `data` raises against it.
pub fn check_against_schema(schema: &Value, data: &Value) -> ObjectTypesResult<()> {
    let compiled = jsonschema::JSONSchema::compile(schema)
        .map_err(|err| ObjectTypesError::InvalidSchema(err.to_string()))?;

    let first_error = match compiled.validate(data) {
        Ok(()) => None,
        Err(mut errors) => errors.next().map(|err| err.to_string()),
    };

    match first_error {
        Some(message) => Err(ObjectTypesError::SchemaMismatch(message)),
        None => Ok(()),
    }
}
