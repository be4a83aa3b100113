// HTTP request handlers
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use store_object::{Page, Patch, Validate, ValidationMode};
use tracing::info;
use uuid::Uuid;

use super::envelope::{ok, ApiResponse, DeleteResult};
use super::error::ApiError;
use super::pagination::ListQuery;
use super::state::AppState;
use crate::entities::{Client, Contract, Entity, Property, Transaction};
use crate::reports::{self, DashboardSummary};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

fn parse_body<P: DeserializeOwned>(body: &Bytes) -> Result<P, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
}

/// Insert the seed rows of `E` when its table is empty and seeding is on
async fn seed_if_enabled<E: Entity>(state: &AppState) -> Result<(), ApiError> {
    if !state.seed.on_list {
        return Ok(());
    }
    let inserted = E::store(&state.stores)
        .ensure_seed(E::seed_records(Utc::now()))
        .await?;
    if inserted > 0 {
        info!(resource = E::RESOURCE, inserted, "seeded empty table");
    }
    Ok(())
}

/// GET /api/{resource}
pub async fn list<E: Entity>(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Page<E>> {
    let Query(pairs) =
        query.map_err(|e| ApiError::BadRequest(format!("invalid query string: {}", e.body_text())))?;
    let request = ListQuery::from_pairs(pairs).page_request(&state)?;
    seed_if_enabled::<E>(&state).await?;
    let page = E::store(&state.stores).list(&request).await?;
    Ok(ok(page))
}

/// POST /api/{resource}
pub async fn create<E: Entity>(State(state): State<AppState>, body: Bytes) -> ApiResult<E> {
    let payload: E::Patch = parse_body(&body)?;
    payload.validate(ValidationMode::Create)?;

    let record = E::from_payload(Uuid::new_v4().to_string(), Utc::now(), payload)?;
    let created = E::store(&state.stores).create(record).await?;
    created.audit();

    info!(resource = E::RESOURCE, id = created.id(), "created {}", E::LABEL);
    Ok(ok(created))
}

/// GET /api/{resource}/:id
pub async fn get<E: Entity>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<E> {
    match E::store(&state.stores).get_by_id(&id).await? {
        Some(record) => Ok(ok(record)),
        None => Err(ApiError::NotFound),
    }
}

/// PUT /api/{resource}/:id
///
/// The payload is validated before the record is looked up, so a bad payload
/// for an unknown id is a 400 rather than a 404.
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<E> {
    let patch: E::Patch = parse_body(&body)?;
    patch.validate(ValidationMode::Update)?;

    match E::store(&state.stores).update(&id, &patch).await? {
        Some(updated) => {
            updated.audit();
            info!(
                resource = E::RESOURCE,
                id = %id,
                fields = ?patch.changed_fields(),
                "updated {}",
                E::LABEL
            );
            Ok(ok(updated))
        }
        None => Err(ApiError::NotFound),
    }
}

/// DELETE /api/{resource}/:id
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResult> {
    let deleted = E::store(&state.stores).delete(&id).await?;
    if deleted {
        info!(resource = E::RESOURCE, id = %id, "deleted {}", E::LABEL);
    }
    Ok(ok(DeleteResult { id, deleted }))
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    state.stores.clients.health_check().await?;
    Ok(ok(HealthStatus { status: "ok" }))
}

/// GET /api/dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<DashboardSummary> {
    seed_if_enabled::<Client>(&state).await?;
    seed_if_enabled::<Property>(&state).await?;
    seed_if_enabled::<Transaction>(&state).await?;
    seed_if_enabled::<Contract>(&state).await?;

    let summary = reports::dashboard(&state.stores).await?;
    Ok(ok(summary))
}

/// Any path without a route
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// A known path with a verb it does not serve
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
