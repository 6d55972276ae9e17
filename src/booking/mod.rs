//! Booking orchestrator: turns a purchase request into issued tickets, a
//! booking header, and a completed payment in one transaction. Capacity is
//! re-checked under a per-category row lock, so two bookings racing on the
//! same category serialize instead of overselling.

pub mod cancel;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::inventory;
use crate::models::{
    Booking, BookingConfirmation, BookingItemRequest, BookingSummary, CreateBookingRequest,
    EventStatus, Payment,
};
use crate::notify::{self, BookingConfirmedNotice, Notifier};
use crate::utils::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct EventGate {
    title: String,
    status: EventStatus,
    start_date: DateTime<Utc>,
}

pub async fn create_booking(
    pool: &PgPool,
    notifier: Arc<dyn Notifier>,
    auth: AuthUser,
    req: CreateBookingRequest,
) -> Result<BookingConfirmation, AppError> {
    let wanted = validate_items(&req.items)?;
    if req.payment_method.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Payment method is required".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let event = sqlx::query_as::<_, EventGate>(
        "SELECT title, status, start_date FROM events WHERE event_id = $1",
    )
    .bind(req.event_id)
    .fetch_optional(&mut *tx)
    .await?;

    let event = match event {
        Some(event) if event.status == EventStatus::Active => event,
        _ => {
            return Err(AppError::Conflict(
                "Event is not available for booking".to_string(),
            ))
        }
    };

    if event.start_date <= Utc::now() {
        return Err(AppError::Conflict(
            "Cannot book tickets for events that have already started".to_string(),
        ));
    }

    // Lock every requested category row before issuing anything. BTreeMap
    // iteration keeps lock acquisition in category order, so concurrent
    // multi-category bookings cannot deadlock on each other.
    let mut priced: BTreeMap<String, (i32, Decimal)> = BTreeMap::new();
    for (category, quantity) in &wanted {
        let locked: Option<(Decimal, i32)> = sqlx::query_as(
            "SELECT price, max_quantity FROM ticket_types WHERE event_id = $1 AND category = $2 FOR UPDATE",
        )
        .bind(req.event_id)
        .bind(category)
        .fetch_optional(&mut *tx)
        .await?;

        let (price, max_quantity) = locked.ok_or_else(|| {
            AppError::NotFound(format!(
                "Ticket category '{}' not found for this event",
                category
            ))
        })?;

        let sold = inventory::confirmed_sold(&mut *tx, req.event_id, category).await?;
        if sold + i64::from(*quantity) > i64::from(max_quantity) {
            return Err(AppError::Conflict(format!(
                "Not enough '{}' tickets available",
                category
            )));
        }

        priced.insert(category.clone(), (*quantity, price));
    }

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (user_id, status)
        VALUES ($1, 'confirmed')
        RETURNING booking_id, user_id, booking_date, status
        "#,
    )
    .bind(auth.user_id)
    .fetch_one(&mut *tx)
    .await?;

    let mut total_amount = Decimal::ZERO;
    let mut ticket_count = 0usize;
    for (category, (quantity, price)) in &priced {
        for _ in 0..*quantity {
            let ticket_id: Uuid = sqlx::query_scalar(
                "INSERT INTO tickets (event_id, category) VALUES ($1, $2) RETURNING ticket_id",
            )
            .bind(req.event_id)
            .bind(category)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO booking_items (booking_id, ticket_id, price_at_purchase) VALUES ($1, $2, $3)",
            )
            .bind(booking.booking_id)
            .bind(ticket_id)
            .bind(price)
            .execute(&mut *tx)
            .await?;

            ticket_count += 1;
        }
        total_amount += *price * Decimal::from(*quantity);
    }

    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (booking_id, amount, payment_method)
        VALUES ($1, $2, $3)
        RETURNING payment_id, booking_id, amount, payment_method, status, payment_date
        "#,
    )
    .bind(booking.booking_id)
    .bind(total_amount)
    .bind(req.payment_method.trim())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    notify::dispatch_confirmation(
        notifier,
        BookingConfirmedNotice {
            user_id: auth.user_id,
            booking_id: booking.booking_id,
            event_title: event.title.clone(),
            ticket_count,
            total_amount,
            payment_method: payment.payment_method.clone(),
        },
    );

    Ok(BookingConfirmation {
        booking,
        total_amount,
        payment,
        event_title: event.title,
    })
}

/// The caller's bookings, newest first, with items aggregated per booking.
pub async fn list_bookings(pool: &PgPool, auth: AuthUser) -> Result<Vec<BookingSummary>, AppError> {
    let rows = sqlx::query_as::<_, BookingSummary>(&summary_query("b.user_id = $1"))
        .bind(auth.user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// A single booking with full detail. Admins may read any booking; other
/// callers only their own.
pub async fn get_booking(
    pool: &PgPool,
    auth: AuthUser,
    booking_id: Uuid,
) -> Result<BookingSummary, AppError> {
    let row = sqlx::query_as::<_, BookingSummary>(&summary_query("b.booking_id = $1"))
        .bind(booking_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let owner_id: Uuid =
        sqlx::query_scalar("SELECT user_id FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_one(pool)
            .await?;

    if !auth.can_act_for(owner_id) {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    Ok(row)
}

fn summary_query(filter: &str) -> String {
    format!(
        r#"
        SELECT
            b.booking_id,
            b.booking_date,
            b.status,
            e.event_id,
            e.title AS event_title,
            e.start_date,
            e.end_date,
            p.status AS payment_status,
            p.payment_method,
            COALESCE(SUM(bi.quantity * bi.price_at_purchase), 0) AS total_amount,
            JSON_AGG(
                JSON_BUILD_OBJECT(
                    'ticket_id', t.ticket_id,
                    'category', t.category,
                    'price', bi.price_at_purchase
                )
            ) AS items
        FROM bookings b
        JOIN booking_items bi ON bi.booking_id = b.booking_id
        JOIN tickets t ON t.ticket_id = bi.ticket_id
        JOIN events e ON e.event_id = t.event_id
        LEFT JOIN payments p ON p.booking_id = b.booking_id
        WHERE {filter}
        GROUP BY b.booking_id, e.event_id, e.title, e.start_date, e.end_date,
                 p.status, p.payment_method
        ORDER BY b.booking_date DESC
        "#
    )
}

fn validate_items(items: &[BookingItemRequest]) -> Result<BTreeMap<String, i32>, AppError> {
    if items.is_empty() {
        return Err(AppError::ValidationError(
            "At least one ticket item is required".to_string(),
        ));
    }

    let mut wanted: BTreeMap<String, i32> = BTreeMap::new();
    for item in items {
        if item.category.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Ticket category is required".to_string(),
            ));
        }
        if item.quantity < 1 {
            return Err(AppError::ValidationError(format!(
                "Quantity for '{}' must be at least 1",
                item.category
            )));
        }
        *wanted.entry(item.category.clone()).or_insert(0) += item.quantity;
    }

    Ok(wanted)
}
