//! Test helpers: a throwaway Objecttypes API served on a local port.
//!
//! Object types under `/api/v2/objecttypes/{id}`:
//! - `open`: no `allowGeometry` key
//! - `allowed`: `allowGeometry: true`
//! - `closed`: `allowGeometry: false`
//! - `private`: like `allowed`, but only with `Authorization: Token <TOKEN>`
//! - `broken`: versions answer without a `jsonSchema`
//! - `garbage`: the document is not JSON
//! - `nullable`: `allowGeometry: null`
//! - `slow`: versions answer after [`SLOW_VERSION_DELAY`]
//!
//! Version 1 of every type requires a string `naam` and allows a numeric
//! `leeftijd`. `slow` also has a version 2 that requires both. Other
//! versions are 404.

use crate::{config::ServiceConfig, services::objecttypes::ObjectTypesClient};
use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;

pub const TOKEN: &str = "secret";
pub const SLOW_VERSION_DELAY: Duration = Duration::from_millis(300);

async fn object_type(Path(id): Path<String>, headers: HeaderMap) -> Response {
    match id.as_str() {
        "open" | "broken" | "slow" => Json(json!({"name": id})).into_response(),
        "nullable" => Json(json!({"name": id, "allowGeometry": null})).into_response(),
        "allowed" => Json(json!({"name": id, "allowGeometry": true})).into_response(),
        "closed" => Json(json!({"name": id, "allowGeometry": false})).into_response(),
        "garbage" => (StatusCode::OK, "<html>").into_response(),
        "private" => {
            let expected = format!("Token {}", TOKEN);
            let authorized = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == expected);
            if authorized {
                Json(json!({"name": id, "allowGeometry": true})).into_response()
            } else {
                StatusCode::FORBIDDEN.into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn object_type_version(Path((id, version)): Path<(String, u32)>) -> Response {
    if id == "slow" {
        tokio::time::sleep(SLOW_VERSION_DELAY).await;
    }
    let required = match (id.as_str(), version) {
        (_, 1) => json!(["naam"]),
        ("slow", 2) => json!(["naam", "leeftijd"]),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    if id == "broken" {
        return Json(json!({"version": version})).into_response();
    }
    Json(json!({
        "version": version,
        "jsonSchema": {
            "type": "object",
            "required": required,
            "properties": {
                "naam": {"type": "string"},
                "leeftijd": {"type": "number"}
            }
        }
    }))
    .into_response()
}

/// Start the fake Objecttypes API and return its API root (trailing slash).
pub async fn spawn_objecttypes() -> String {
    let app = Router::new()
        .route("/api/v2/objecttypes/{id}", get(object_type))
        .route(
            "/api/v2/objecttypes/{id}/versions/{version}",
            get(object_type_version),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api/v2/", addr)
}

/// An API root on a port nothing listens on.
pub async fn unreachable_api_root() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/v2/", addr)
}

pub fn objecttypes_client(api_root: &str) -> ObjectTypesClient {
    ObjectTypesClient::new(
        vec![ServiceConfig {
            api_root: api_root.to_string(),
            auth_token: None,
        }],
        Duration::from_secs(5),
    )
    .unwrap()
}
