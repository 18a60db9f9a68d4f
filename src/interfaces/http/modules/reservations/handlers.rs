//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::application::booking::clock;
use crate::application::ReservationService;
use crate::domain::CustomerKey;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub service: Arc<ReservationService>,
}

/// `POST /api/v1/reservations`
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> ApiResult<ReservationDto> {
    let cmd = request.into_command().map_err(domain_error)?;
    let reservation = state.service.create(cmd).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `GET /api/v1/reservations` — filtered by date or customer,
/// upcoming reservations when no filter is given.
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Query(query): Query<ListReservationsQuery>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = if let Some(date) = &query.date {
        let date = clock::parse_date(date).map_err(domain_error)?;
        state.service.list_by_date(date).await.map_err(domain_error)?
    } else if query.customer_id.is_some() || query.phone.is_some() {
        let key = CustomerKey {
            customer_id: query.customer_id,
            phone: query.phone,
        };
        state
            .service
            .list_by_customer(&key)
            .await
            .map_err(domain_error)?
    } else {
        state.service.list_upcoming().await.map_err(domain_error)?
    };

    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

/// `GET /api/v1/reservations/{id}`
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.service.get(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `GET /api/v1/reservations/code/{code}` — customer self-service lookup
pub async fn get_reservation_by_code(
    State(state): State<ReservationAppState>,
    Path(code): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.service.get_by_code(&code).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `PUT /api/v1/reservations/{id}`
pub async fn update_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateReservationRequest>,
) -> ApiResult<ReservationDto> {
    let cmd = request.into_command().map_err(domain_error)?;
    let reservation = state.service.update(&id, cmd).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `POST /api/v1/reservations/{id}/confirm`
pub async fn confirm_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.service.confirm(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `POST /api/v1/reservations/{id}/seat`
pub async fn seat_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    Json(request): Json<SeatRequest>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .service
        .seat(&id, request.table_id, request.table_number)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `POST /api/v1/reservations/{id}/complete`
pub async fn complete_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    Json(request): Json<CompleteRequest>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .service
        .complete(&id, request.actual_spend)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `POST /api/v1/reservations/{id}/cancel`
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    Json(request): Json<CancelRequest>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .service
        .cancel(&id, request.reason)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `POST /api/v1/reservations/{id}/no-show`
pub async fn no_show_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.service.mark_no_show(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
