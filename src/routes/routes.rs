//! Defines routes for the versioned objects API.
//!
//! ## Structure
//! - **Root**
//!   - `GET /healthz`, `GET /readyz`
//!
//! - **Per version** (`/v1`, `/v2`)
//!   - `GET    /objects` — list objects (supports `data_attrs`; v2 also `page`, `pageSize`)
//!   - `POST   /objects` — create object
//!   - `GET    /objects/{uuid}` — retrieve object
//!   - `PUT    /objects/{uuid}` — full update
//!   - `PATCH  /objects/{uuid}` — partial update
//!   - `DELETE /objects/{uuid}` — delete object

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        object_handlers::{
            create_object, delete_object, get_object, list_objects_v1, list_objects_v2,
            partial_update_object, update_object,
        },
    },
    services::object_service::ObjectService,
};
use axum::{
    Router,
    routing::{MethodRouter, get},
};

/// Object routes shared by both versions, listed with `list`.
fn object_routes(list: MethodRouter<ObjectService>) -> Router<ObjectService> {
    Router::new()
        .route("/objects", list.post(create_object))
        .route(
            "/objects/{uuid}",
            get(get_object)
                .put(update_object)
                .patch(partial_update_object)
                .delete(delete_object),
        )
}

pub fn v1_routes() -> Router<ObjectService> {
    object_routes(get(list_objects_v1))
}

pub fn v2_routes() -> Router<ObjectService> {
    object_routes(get(list_objects_v2))
}

/// Build and return the router for the whole API.
///
/// The router carries shared state (`ObjectService`) to all handlers.
pub fn routes() -> Router<ObjectService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/v1", v1_routes())
        .nest("/v2", v2_routes())
}
