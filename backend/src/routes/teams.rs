//! Team member routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::team::{InviteMember, InviteResult, TeamMember};
use crate::services::team as team_service;
use crate::AppState;

/// GET /api/v1/teams
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<TeamMember>>>, AppError> {
    let members = team_service::list(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(members))
}

/// POST /api/v1/teams
pub async fn invite(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<InviteMember>,
) -> Result<Json<ApiResponse<InviteResult>>, AppError> {
    body.validate()?;
    let result = team_service::invite(&state.db, current_user.id, &body).await?;
    Ok(ApiResponse::success(result))
}

/// DELETE /api/v1/teams/{id}
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(member_id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    team_service::remove(&state.db, current_user.id, member_id).await?;
    Ok(ApiResponse::success("Team member removed successfully"))
}
