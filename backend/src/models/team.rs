//! Team member invitations owned by an event creator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Admin,
    Editor,
    Viewer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Active,
}

/// Team listing row; `name` is resolved from users by email.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeamMember {
    pub id: Uuid,
    pub email: String,
    pub role: TeamRole,
    pub status: MemberStatus,
    pub joined_date: Option<DateTime<Utc>>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteMember {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    pub role: TeamRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteResult {
    pub member_id: Uuid,
    pub message: String,
}
