//! Admin reservation management handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use tablebook_core::types::pagination::PageResponse;
use tablebook_entity::reservation::{Reservation, ReservationCounts, ReservationFilter};

use crate::dto::request::{AdminReservationQuery, StatsQuery, UpdateStatusRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ApiPath, ApiQuery, AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/admin/reservations?status=&venue_id=&from=&to=&page=&limit=
pub async fn list_reservations(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(filter): ApiQuery<AdminReservationQuery>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Reservation>>>> {
    let page = state
        .admin_reservation_service
        .list(
            &auth,
            &ReservationFilter::from(filter),
            &params.into_page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// PUT /api/admin/reservations/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<Reservation>>> {
    let reservation = state
        .admin_reservation_service
        .set_status(&auth, id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// DELETE /api/admin/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.admin_reservation_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/reservations/stats?venue_id=
pub async fn reservation_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> ApiResult<Json<ApiResponse<ReservationCounts>>> {
    let filter = ReservationFilter {
        venue_id: query.venue_id,
        ..Default::default()
    };
    let counts = state
        .admin_reservation_service
        .stats(&auth, &filter)
        .await?;
    Ok(Json(ApiResponse::ok(counts)))
}
