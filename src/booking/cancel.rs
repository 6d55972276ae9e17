//! Cancellation/refund controller. Flips the booking to cancelled and the
//! payment to refunded in one transaction; ticket and booking-item rows stay
//! in place as the audit trail and simply stop counting against capacity.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::{Booking, BookingStatus};
use crate::notify::{self, BookingCancelledNotice, Notifier};
use crate::utils::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct BookedEvent {
    title: String,
    start_date: DateTime<Utc>,
}

pub async fn cancel_booking(
    pool: &PgPool,
    notifier: Arc<dyn Notifier>,
    auth: AuthUser,
    booking_id: Uuid,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let booking = sqlx::query_as::<_, Booking>(
        "SELECT booking_id, user_id, booking_date, status FROM bookings WHERE booking_id = $1 FOR UPDATE",
    )
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if !auth.can_act_for(booking.user_id) {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    match booking.status {
        BookingStatus::Confirmed => {}
        BookingStatus::Cancelled => {
            return Err(AppError::Conflict(
                "Booking is already cancelled".to_string(),
            ))
        }
        BookingStatus::Refunded => {
            return Err(AppError::Conflict(
                "Booking has already been refunded".to_string(),
            ))
        }
    }

    let event = sqlx::query_as::<_, BookedEvent>(
        r#"
        SELECT e.title, e.start_date
        FROM events e
        JOIN tickets t ON t.event_id = e.event_id
        JOIN booking_items bi ON bi.ticket_id = t.ticket_id
        WHERE bi.booking_id = $1
        LIMIT 1
        "#,
    )
    .bind(booking_id)
    .fetch_one(&mut *tx)
    .await?;

    if event.start_date <= Utc::now() {
        return Err(AppError::Conflict(
            "Cannot cancel booking for events that have already started".to_string(),
        ));
    }

    sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE booking_id = $1")
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE payments SET status = 'refunded' WHERE booking_id = $1")
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO notifications (user_id, message) VALUES ($1, $2)")
        .bind(booking.user_id)
        .bind(format!(
            "Your booking (ID: {}) has been cancelled and refund will be processed.",
            booking_id
        ))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    notify::dispatch_cancellation(
        notifier,
        BookingCancelledNotice {
            user_id: booking.user_id,
            booking_id,
            event_title: event.title,
        },
    );

    Ok(())
}
