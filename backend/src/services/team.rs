//! Team member management for event creators.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::team::{InviteMember, InviteResult, TeamMember};

/// Team emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Caller's team, newest invitation first.
pub async fn list(pool: &PgPool, owner_id: Uuid) -> Result<Vec<TeamMember>, AppError> {
    let rows = sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT
            tm.id,
            tm.member_email AS email,
            tm.role,
            tm.status,
            tm.joined_date,
            COALESCE(u.full_name, '') AS name
        FROM team_members tm
        LEFT JOIN users u ON u.email = tm.member_email
        WHERE tm.user_id = $1
        ORDER BY tm.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Add a pending member to the caller's team.
pub async fn invite(
    pool: &PgPool,
    owner_id: Uuid,
    input: &InviteMember,
) -> Result<InviteResult, AppError> {
    let email = normalize_email(&input.email);

    let member_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO team_members (user_id, member_email, role)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(&email)
    .bind(input.role)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Team member already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    tracing::info!(owner_id = %owner_id, member_id = %member_id, role = ?input.role, "Team member invited");

    Ok(InviteResult {
        member_id,
        message: "Team member invited successfully".to_string(),
    })
}

/// Remove a member from the caller's team.
pub async fn remove(pool: &PgPool, owner_id: Uuid, member_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM team_members WHERE id = $1 AND user_id = $2")
        .bind(member_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Team member not found".to_string()));
    }

    tracing::info!(owner_id = %owner_id, member_id = %member_id, "Team member removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_normalized() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
