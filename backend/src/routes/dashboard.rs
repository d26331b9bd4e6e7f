//! Dashboard routes: the creator's sales overview.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::dashboard::{self, Dashboard};
use crate::AppState;

/// GET /api/v1/dashboard/stats — stats, per-event sales, and recent purchases.
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Dashboard>>, AppError> {
    let dashboard = dashboard::get_dashboard(
        &state.db,
        current_user.id,
        Utc::now(),
        state.config.display_offset(),
    )
    .await?;
    Ok(ApiResponse::success(dashboard))
}
