//! Table HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::domain::{DomainError, RepositoryProvider, Table, TableStatus};
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};

use super::dto::*;

/// Application state for table handlers.
#[derive(Clone)]
pub struct TableAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

/// `POST /api/v1/tables`
pub async fn register_table(
    State(state): State<TableAppState>,
    ValidatedJson(request): ValidatedJson<RegisterTableRequest>,
) -> ApiResult<TableDto> {
    let mut table = Table::new(request.number, request.capacity);
    if let Some(min) = request.min_party_size {
        table.min_party_size = min;
    }
    if let Some(max) = request.max_party_size {
        table.max_party_size = max;
    }
    table.area = request.area;
    table.features = request.features;
    table.accessible = request.accessible;

    state
        .repos
        .tables()
        .save(table.clone())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(table.into())))
}

/// `GET /api/v1/tables`
pub async fn list_tables(State(state): State<TableAppState>) -> ApiResult<Vec<TableDto>> {
    let tables = state.repos.tables().find_all().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        tables.into_iter().map(TableDto::from).collect(),
    )))
}

/// `GET /api/v1/tables/{id}`
pub async fn get_table(
    State(state): State<TableAppState>,
    Path(id): Path<String>,
) -> ApiResult<TableDto> {
    let table = state
        .repos
        .tables()
        .find_by_id(&id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| domain_error(DomainError::not_found("table", "id", id)))?;
    Ok(Json(ApiResponse::success(table.into())))
}

/// `PUT /api/v1/tables/{id}/status` — administrative status changes only.
/// `reserved` and `occupied` are managed by the reservation lifecycle and
/// cannot be set here.
pub async fn set_table_status(
    State(state): State<TableAppState>,
    Path(id): Path<String>,
    Json(request): Json<SetTableStatusRequest>,
) -> ApiResult<TableDto> {
    let status = TableStatus::from_str(&request.status).ok_or_else(|| {
        domain_error(DomainError::Validation(format!(
            "Unknown table status '{}'",
            request.status
        )))
    })?;
    if matches!(status, TableStatus::Reserved | TableStatus::Occupied) {
        return Err(domain_error(DomainError::Validation(format!(
            "Status '{}' is managed by the reservation lifecycle",
            status
        ))));
    }

    state
        .repos
        .tables()
        .set_status(&id, status, None)
        .await
        .map_err(domain_error)?;

    let table = state
        .repos
        .tables()
        .find_by_id(&id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| domain_error(DomainError::not_found("table", "id", id)))?;
    Ok(Json(ApiResponse::success(table.into())))
}
