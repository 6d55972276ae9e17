//! Ticket-inventory ledger: category definitions and availability, derived
//! from confirmed bookings only. Cancelled and refunded bookings keep their
//! ticket rows but stop counting against capacity.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::{
    CategoryAvailability, ConfirmedBookingSummary, NewTicketType, TicketType, UpdateTicketType,
};
use crate::utils::error::AppError;

/// Per-category availability for an event, cheapest first.
pub async fn availability(
    pool: &PgPool,
    event_id: Uuid,
) -> Result<Vec<CategoryAvailability>, AppError> {
    let rows = sqlx::query_as::<_, CategoryAvailability>(
        r#"
        SELECT
            tt.category,
            tt.price,
            tt.max_quantity,
            COUNT(b.booking_id)::INT AS sold_quantity,
            (tt.max_quantity - COUNT(b.booking_id))::INT AS available_quantity
        FROM ticket_types tt
        LEFT JOIN tickets t
            ON t.event_id = tt.event_id AND t.category = tt.category
        LEFT JOIN booking_items bi ON bi.ticket_id = t.ticket_id
        LEFT JOIN bookings b
            ON b.booking_id = bi.booking_id AND b.status = 'confirmed'
        WHERE tt.event_id = $1
        GROUP BY tt.category, tt.price, tt.max_quantity
        ORDER BY tt.price ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Number of tickets in `category` whose owning booking is still confirmed.
/// Inside the booking transaction this runs under the category's row lock,
/// so the value cannot move until the transaction resolves.
pub async fn confirmed_sold<'e, E>(
    executor: E,
    event_id: Uuid,
    category: &str,
) -> Result<i64, AppError>
where
    E: PgExecutor<'e>,
{
    let sold: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM tickets t
        JOIN booking_items bi ON bi.ticket_id = t.ticket_id
        JOIN bookings b ON b.booking_id = bi.booking_id
        WHERE t.event_id = $1
          AND t.category = $2
          AND b.status = 'confirmed'
        "#,
    )
    .bind(event_id)
    .bind(category)
    .fetch_one(executor)
    .await?;

    Ok(sold)
}

/// Defines a new ticket category for an event. Organizer of the event or
/// admin only; duplicate (event, category) pairs are rejected.
pub async fn define_category(
    pool: &PgPool,
    auth: AuthUser,
    event_id: Uuid,
    new_type: NewTicketType,
) -> Result<TicketType, AppError> {
    validate_category(&new_type)?;
    require_event_ownership(pool, auth, event_id).await?;

    let ticket_type = sqlx::query_as::<_, TicketType>(
        r#"
        INSERT INTO ticket_types (event_id, category, price, max_quantity)
        VALUES ($1, $2, $3, $4)
        RETURNING event_id, category, price, max_quantity
        "#,
    )
    .bind(event_id)
    .bind(&new_type.category)
    .bind(new_type.price)
    .bind(new_type.max_quantity)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(e, "Ticket category already exists for this event")
    })?;

    Ok(ticket_type)
}

/// Re-prices or re-sizes a category. Blocked once any ticket of the
/// category has been sold.
pub async fn update_category(
    pool: &PgPool,
    auth: AuthUser,
    event_id: Uuid,
    category: &str,
    update: UpdateTicketType,
) -> Result<TicketType, AppError> {
    require_event_ownership(pool, auth, event_id).await?;

    let mut tx = pool.begin().await?;
    let existing = require_unsold_category(&mut *tx, event_id, category).await?;

    let price = update.price.unwrap_or(existing.price);
    let max_quantity = update.max_quantity.unwrap_or(existing.max_quantity);
    validate_category(&NewTicketType {
        category: category.to_string(),
        price,
        max_quantity,
    })?;

    let ticket_type = sqlx::query_as::<_, TicketType>(
        r#"
        UPDATE ticket_types
        SET price = $3, max_quantity = $4
        WHERE event_id = $1 AND category = $2
        RETURNING event_id, category, price, max_quantity
        "#,
    )
    .bind(event_id)
    .bind(category)
    .bind(price)
    .bind(max_quantity)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(ticket_type)
}

/// Removes a category. Blocked once any ticket of the category has been
/// sold.
pub async fn delete_category(
    pool: &PgPool,
    auth: AuthUser,
    event_id: Uuid,
    category: &str,
) -> Result<(), AppError> {
    require_event_ownership(pool, auth, event_id).await?;

    let mut tx = pool.begin().await?;
    require_unsold_category(&mut *tx, event_id, category).await?;

    sqlx::query("DELETE FROM ticket_types WHERE event_id = $1 AND category = $2")
        .bind(event_id)
        .bind(category)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Confirmed bookings for an event with their computed refund amounts.
/// This is the feed the external bulk-refund workflow consumes when an
/// event is cancelled.
pub async fn confirmed_bookings_for_event(
    pool: &PgPool,
    auth: AuthUser,
    event_id: Uuid,
) -> Result<Vec<ConfirmedBookingSummary>, AppError> {
    require_event_ownership(pool, auth, event_id).await?;

    let rows = sqlx::query_as::<_, ConfirmedBookingSummary>(
        r#"
        SELECT
            b.booking_id,
            b.user_id,
            u.name AS user_name,
            u.email AS user_email,
            b.booking_date,
            COUNT(bi.ticket_id) AS ticket_count,
            COALESCE(SUM(bi.price_at_purchase * bi.quantity), 0) AS refund_amount
        FROM bookings b
        JOIN booking_items bi ON bi.booking_id = b.booking_id
        JOIN tickets t ON t.ticket_id = bi.ticket_id
        JOIN users u ON u.user_id = b.user_id
        WHERE t.event_id = $1
          AND b.status = 'confirmed'
        GROUP BY b.booking_id, b.user_id, u.name, u.email, b.booking_date
        ORDER BY b.booking_date ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub(crate) fn validate_category(new_type: &NewTicketType) -> Result<(), AppError> {
    if new_type.category.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Category name is required".to_string(),
        ));
    }
    if new_type.price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Price must not be negative".to_string(),
        ));
    }
    if new_type.max_quantity < 1 {
        return Err(AppError::ValidationError(
            "Maximum quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

async fn require_event_ownership(
    pool: &PgPool,
    auth: AuthUser,
    event_id: Uuid,
) -> Result<(), AppError> {
    let organizer_id: Option<Uuid> =
        sqlx::query_scalar("SELECT organizer_id FROM events WHERE event_id = $1")
            .bind(event_id)
            .fetch_optional(pool)
            .await?;

    let organizer_id =
        organizer_id.ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if !auth.can_act_for(organizer_id) {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    Ok(())
}

/// Locks the category row and verifies nothing has been sold against it.
/// Runs inside the caller's transaction, so the row lock serializes this
/// guard with any booking racing on the same category.
async fn require_unsold_category(
    conn: &mut PgConnection,
    event_id: Uuid,
    category: &str,
) -> Result<TicketType, AppError> {
    let ticket_type = sqlx::query_as::<_, TicketType>(
        "SELECT event_id, category, price, max_quantity FROM ticket_types WHERE event_id = $1 AND category = $2 FOR UPDATE",
    )
    .bind(event_id)
    .bind(category)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Ticket type not found".to_string()))?;

    let sold = confirmed_sold(&mut *conn, event_id, category).await?;
    if sold > 0 {
        return Err(AppError::Conflict(
            "Cannot modify a ticket category with existing sales".to_string(),
        ));
    }

    Ok(ticket_type)
}
