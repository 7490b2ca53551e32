//! Requester reservation handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use tablebook_admission::ReservationRequest;
use tablebook_core::error::AppError;
use tablebook_core::types::pagination::PageResponse;
use tablebook_entity::reservation::Reservation;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ApiPath, ApiQuery, AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/venues/{venue_id}/reservations
///
/// The body fields are checked by the admission validator, so a
/// missing field is reported by rule rather than as a decoding error.
pub async fn create_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(venue_id): ApiPath<Uuid>,
    body: Result<Json<ReservationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Reservation>>)> {
    let Json(request) = body
        .map_err(|e| AppError::validation(e.body_text()).with_code("INVALID_BODY"))?;
    let reservation = state
        .reservation_service
        .create(&auth, venue_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(reservation))))
}

/// GET /api/reservations/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Reservation>>>> {
    let page = state
        .reservation_service
        .list_mine(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Reservation>>> {
    let reservation = state.reservation_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// POST /api/reservations/{id}/cancel
pub async fn cancel_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Reservation>>> {
    let reservation = state.reservation_service.cancel(&auth, id).await?;
    Ok(Json(ApiResponse::ok(reservation)))
}
