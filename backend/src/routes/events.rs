//! Event routes: creation, discovery, publishing, engagement counters.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::event::{CreateEvent, Event, EventDetail, EventFilters, EventSummary, OwnedEventDetail};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::event::{self as event_service, Counter};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CounterValue {
    pub event_id: Uuid,
    pub value: i64,
}

/// POST /api/v1/events — create an unpublished event owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateEvent>,
) -> Result<Json<ApiResponse<EventDetail>>, AppError> {
    body.validate()?;
    let event = event_service::create(&state.db, current_user.id, &body).await?;
    Ok(ApiResponse::success(event))
}

/// GET /api/v1/events — published events with search and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<EventFilters>,
) -> Result<Json<ApiResponse<PagedResult<EventSummary>>>, AppError> {
    let result = event_service::list_published(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/events/mine — the caller's events with ticket counts.
pub async fn mine(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<OwnedEventDetail>>>, AppError> {
    let events = event_service::list_owned(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(events))
}

/// GET /api/v1/events/{id} — event details with images.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventDetail>>, AppError> {
    let event = event_service::get_detail(&state.db, id).await?;
    Ok(ApiResponse::success(event))
}

/// POST /api/v1/events/{id}/publish — owner only.
pub async fn publish(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = event_service::publish(&state.db, current_user.id, id).await?;
    Ok(ApiResponse::success(event))
}

/// POST /api/v1/events/{id}/view
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CounterValue>>, AppError> {
    let value = event_service::bump_counter(&state.db, id, Counter::Views).await?;
    Ok(ApiResponse::success(CounterValue { event_id: id, value }))
}

/// POST /api/v1/events/{id}/share
pub async fn record_share(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CounterValue>>, AppError> {
    let value = event_service::bump_counter(&state.db, id, Counter::Shares).await?;
    Ok(ApiResponse::success(CounterValue { event_id: id, value }))
}
