//! Event lifecycle controller. Events advance active -> completed through a
//! periodic sweep keyed on the current status, and active -> cancelled
//! through an administrative action that hands the confirmed bookings to the
//! external refund workflow.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::inventory;
use crate::models::ConfirmedBookingSummary;
use crate::utils::error::AppError;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct CompletedEvent {
    pub event_id: Uuid,
    pub title: String,
}

/// Marks every active event whose end date has passed as completed. The
/// update is conditioned on the current status, so re-running it (or racing
/// another instance) is a no-op for already-completed rows.
pub async fn complete_expired_events(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<Vec<CompletedEvent>, AppError> {
    let completed = sqlx::query_as::<_, CompletedEvent>(
        r#"
        UPDATE events
        SET status = 'completed'
        WHERE status = 'active'
          AND end_date < $1
        RETURNING event_id, title
        "#,
    )
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(completed)
}

/// Runs the completion sweep immediately and then on every interval tick.
/// Sweep failures are logged and the task keeps running.
pub fn spawn_sweeper(pool: PgPool, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            // The first tick fires at once, which covers the startup run.
            ticker.tick().await;
            match complete_expired_events(&pool, Utc::now()).await {
                Ok(completed) if completed.is_empty() => {
                    debug!("Lifecycle sweep found no expired events");
                }
                Ok(completed) => {
                    info!(count = completed.len(), "Auto-completed expired events");
                    for event in &completed {
                        debug!(event_id = %event.event_id, title = %event.title, "Event completed");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Lifecycle sweep failed");
                }
            }
        }
    })
}

/// Administrative cancellation of an active event. Returns the confirmed
/// bookings with their refund amounts so the external refund workflow can
/// take over; settlement and attendee outreach happen there.
pub async fn cancel_event(
    pool: &PgPool,
    auth: AuthUser,
    event_id: Uuid,
) -> Result<Vec<ConfirmedBookingSummary>, AppError> {
    if !auth.role.is_admin() {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    let cancelled: Option<Uuid> = sqlx::query_scalar(
        "UPDATE events SET status = 'cancelled' WHERE event_id = $1 AND status = 'active' RETURNING event_id",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    if cancelled.is_none() {
        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT event_id FROM events WHERE event_id = $1")
                .bind(event_id)
                .fetch_optional(pool)
                .await?;
        return match exists {
            Some(_) => Err(AppError::Conflict("Event is not active".to_string())),
            None => Err(AppError::NotFound("Event not found".to_string())),
        };
    }

    info!(event_id = %event_id, "Event cancelled, handing bookings to refund workflow");
    inventory::confirmed_bookings_for_event(pool, auth, event_id).await
}
