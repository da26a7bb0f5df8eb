//! HTTP handlers for object operations.
//! Both API versions share the write handlers; only listing differs.

use crate::{
    errors::AppError,
    models::object::{ObjectPatch, ObjectRecord},
    services::object_service::{ObjectService, UpdateMode},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: usize = 100;
const MAX_PAGE_SIZE: usize = 500;

/// Query params accepted when listing objects.
#[derive(Debug, Deserialize)]
pub struct ListObjectsQuery {
    pub data_attrs: Option<String>,
    pub page: Option<usize>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<usize>,
}

/// Paginated list body used by v2.
#[derive(Debug, Serialize)]
pub struct Page {
    pub count: usize,
    pub next: Option<usize>,
    pub previous: Option<usize>,
    pub results: Vec<ObjectRecord>,
}

/// Slice `records` into the requested 1-based page.
fn paginate(records: Vec<ObjectRecord>, page: usize, page_size: usize) -> Result<Page, AppError> {
    let count = records.len();
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if page == 0 || (page > 1 && start >= count) {
        return Err(AppError::not_found("Invalid page."));
    }

    let results: Vec<ObjectRecord> = records.into_iter().skip(start).take(page_size).collect();
    let next = (start + results.len() < count).then_some(page + 1);
    let previous = (page > 1).then(|| page - 1);

    Ok(Page {
        count,
        next,
        previous,
        results,
    })
}

/// GET `/v1/objects` — all matching objects as a bare array.
pub async fn list_objects_v1(
    State(service): State<ObjectService>,
    query: Result<Query<ListObjectsQuery>, QueryRejection>,
) -> Result<Json<Vec<ObjectRecord>>, AppError> {
    let Query(q) = query?;
    let records = service.list_objects(q.data_attrs.as_deref()).await?;
    Ok(Json(records))
}

/// GET `/v2/objects` — paginated, supports ?page=&pageSize=
pub async fn list_objects_v2(
    State(service): State<ObjectService>,
    query: Result<Query<ListObjectsQuery>, QueryRejection>,
) -> Result<Json<Page>, AppError> {
    let Query(q) = query?;
    let records = service.list_objects(q.data_attrs.as_deref()).await?;
    let page = paginate(
        records,
        q.page.unwrap_or(1),
        q.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )?;
    Ok(Json(page))
}

/// POST `/objects`
pub async fn create_object(
    State(service): State<ObjectService>,
    body: Result<Json<ObjectPatch>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(patch) = body?;
    let record = service.create_object(patch).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET `/objects/{uuid}`
pub async fn get_object(
    State(service): State<ObjectService>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ObjectRecord>, AppError> {
    Ok(Json(service.get_object(uuid).await?))
}

/// PUT `/objects/{uuid}` — `type` must be present.
pub async fn update_object(
    State(service): State<ObjectService>,
    Path(uuid): Path<Uuid>,
    body: Result<Json<ObjectPatch>, JsonRejection>,
) -> Result<Json<ObjectRecord>, AppError> {
    let Json(patch) = body?;
    let record = service.update_object(uuid, patch, UpdateMode::Full).await?;
    Ok(Json(record))
}

/// PATCH `/objects/{uuid}`
pub async fn partial_update_object(
    State(service): State<ObjectService>,
    Path(uuid): Path<Uuid>,
    body: Result<Json<ObjectPatch>, JsonRejection>,
) -> Result<Json<ObjectRecord>, AppError> {
    let Json(patch) = body?;
    let record = service
        .update_object(uuid, patch, UpdateMode::Partial)
        .await?;
    Ok(Json(record))
}

/// DELETE `/objects/{uuid}`
pub async fn delete_object(
    State(service): State<ObjectService>,
    Path(uuid): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_object(uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}
