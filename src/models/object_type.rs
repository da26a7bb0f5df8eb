//! A remote object type resolved against a configured Objecttypes service.

use crate::config::ServiceConfig;

/// Object type reference: the URL the client sent plus the service that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub url: String,
    pub service: ServiceConfig,
}

impl ObjectType {
    pub fn versions_url(&self) -> String {
        format!("{}/versions", self.url.trim_end_matches('/'))
    }

    pub fn version_url(&self, version: u32) -> String {
        format!("{}/{}", self.versions_url(), version)
    }
}
