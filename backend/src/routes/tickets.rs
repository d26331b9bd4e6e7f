//! Ticket purchase and payment history routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::ticket::{PurchaseSummary, PurchaseTickets};
use crate::services::ticket as ticket_service;
use crate::AppState;

/// POST /api/v1/events/{id}/tickets
pub async fn purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(body): Json<PurchaseTickets>,
) -> Result<Json<ApiResponse<PurchaseSummary>>, AppError> {
    body.validate()?;
    let summary =
        ticket_service::purchase(&state.db, current_user.id, event_id, body.quantity).await?;
    Ok(ApiResponse::success(summary))
}

/// GET /api/v1/tickets/mine — payment history.
pub async fn mine(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<PurchaseSummary>>>, AppError> {
    let history = ticket_service::list_purchases(&state.db, current_user.id, &pagination).await?;
    Ok(ApiResponse::success(history))
}
