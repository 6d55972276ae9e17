use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::Notification;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};
use crate::AppState;

const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct NotificationFilters {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filters): Query<NotificationFilters>,
) -> Result<Response, AppError> {
    let limit = filters.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 200);

    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT notification_id, user_id, message, is_read, created_at
        FROM notifications
        WHERE user_id = $1
          AND (NOT $2 OR is_read = FALSE)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(auth.user_id)
    .bind(filters.unread_only)
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(notifications, "Notifications fetched successfully").into_response())
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let updated = sqlx::query_as::<_, Notification>(
        r#"
        UPDATE notifications
        SET is_read = TRUE
        WHERE notification_id = $1 AND user_id = $2
        RETURNING notification_id, user_id, message, is_read, created_at
        "#,
    )
    .bind(notification_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(success(updated, "Notification marked as read").into_response())
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
        .bind(auth.user_id)
        .execute(&state.pool)
        .await?;

    Ok(empty_success("All notifications marked as read").into_response())
}
