//! Public venue handlers: browsing and slot availability.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use tablebook_admission::SlotAvailability;
use tablebook_admission::validator::parse_time;
use tablebook_core::error::AppError;
use tablebook_core::types::pagination::PageResponse;
use tablebook_entity::venue::Venue;
use tablebook_service::VenueDetail;

use crate::dto::request::AvailabilityQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ApiPath, ApiQuery, PaginationParams};
use crate::state::AppState;

/// GET /api/venues
pub async fn list_venues(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Venue>>>> {
    let page = state
        .venue_service
        .list(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/venues/{id}
pub async fn get_venue(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<VenueDetail>>> {
    let venue = state.venue_service.get(id).await?;
    Ok(Json(ApiResponse::ok(venue)))
}

/// GET /api/venues/{id}/availability?date=&time=
pub async fn availability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> ApiResult<Json<ApiResponse<SlotAvailability>>> {
    let time = parse_time(&query.time).ok_or_else(|| {
        AppError::validation(format!("Time '{}' must be HH:MM", query.time))
            .with_code("INVALID_QUERY")
    })?;
    let slot = state
        .reservation_service
        .availability(id, query.date, time)
        .await?;
    Ok(Json(ApiResponse::ok(slot)))
}
