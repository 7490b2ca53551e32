//! Admin venue and table management handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use tablebook_entity::table::DiningTable;
use tablebook_entity::venue::{CreateVenue, UpdateVenue, Venue};

use crate::dto::request::{CreateTableRequest, CreateVenueRequest, UpdateVenueRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ApiPath, AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/admin/venues
pub async fn create_venue(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateVenueRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Venue>>)> {
    let venue = state
        .venue_service
        .create(&auth, &CreateVenue::from(req))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(venue))))
}

/// PUT /api/admin/venues/{id}
pub async fn update_venue(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateVenueRequest>,
) -> ApiResult<Json<ApiResponse<Venue>>> {
    let venue = state
        .venue_service
        .update(&auth, id, &UpdateVenue::from(req))
        .await?;
    Ok(Json(ApiResponse::ok(venue)))
}

/// DELETE /api/admin/venues/{id}
pub async fn delete_venue(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.venue_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/venues/{id}/tables
pub async fn add_table(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(venue_id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateTableRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DiningTable>>)> {
    let table = state
        .venue_service
        .add_table(&auth, venue_id, &req.label, req.capacity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(table))))
}

/// DELETE /api/admin/venues/{id}/tables/{table_id}
pub async fn remove_table(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((venue_id, table_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .venue_service
        .remove_table(&auth, venue_id, table_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
