use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::inventory;
use crate::lifecycle;
use crate::models::{CreateEventRequest, Event, EventDetails, EventStatus, TicketType};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EventFilters {
    pub status: Option<EventStatus>,
    pub search: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(filters): Query<EventFilters>,
) -> Result<Response, AppError> {
    let status = filters.status.unwrap_or(EventStatus::Active);

    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT event_id, organizer_id, venue_id, category_id, title, description,
               start_date, end_date, status, created_at
        FROM events
        WHERE status = $1
          AND ($2::TEXT IS NULL
               OR title ILIKE '%' || $2 || '%'
               OR COALESCE(description, '') ILIKE '%' || $2 || '%')
        ORDER BY start_date ASC
        "#,
    )
    .bind(status)
    .bind(filters.search)
    .fetch_all(&state.pool)
    .await?;

    let mut details = Vec::with_capacity(events.len());
    for event in events {
        let tickets = inventory::availability(&state.pool, event.event_id).await?;
        details.push(EventDetails { event, tickets });
    }

    Ok(success(details, "Events fetched successfully").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        SELECT event_id, organizer_id, venue_id, category_id, title, description,
               start_date, end_date, status, created_at
        FROM events
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let tickets = inventory::availability(&state.pool, event_id).await?;
    Ok(success(EventDetails { event, tickets }, "Event fetched successfully").into_response())
}

#[derive(Debug, Serialize)]
struct CreatedEvent {
    #[serde(flatten)]
    event: Event,
    ticket_types: Vec<TicketType>,
}

/// Creates an event and seeds its initial ticket categories in one
/// transaction.
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::ValidationError("Title is required".to_string()));
    }
    if req.end_date <= req.start_date {
        return Err(AppError::ValidationError(
            "End date must be after start date".to_string(),
        ));
    }
    for ticket in &req.tickets {
        inventory::validate_category(ticket)?;
    }

    let mut tx = state.pool.begin().await?;

    let event = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (organizer_id, venue_id, category_id, title, description, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING event_id, organizer_id, venue_id, category_id, title, description,
                  start_date, end_date, status, created_at
        "#,
    )
    .bind(auth.user_id)
    .bind(req.venue_id)
    .bind(req.category_id)
    .bind(req.title.trim())
    .bind(&req.description)
    .bind(req.start_date)
    .bind(req.end_date)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::not_found_on_fk(e, "Venue or category not found"))?;

    let mut ticket_types = Vec::with_capacity(req.tickets.len());
    for ticket in &req.tickets {
        let ticket_type = sqlx::query_as::<_, TicketType>(
            r#"
            INSERT INTO ticket_types (event_id, category, price, max_quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING event_id, category, price, max_quantity
            "#,
        )
        .bind(event.event_id)
        .bind(&ticket.category)
        .bind(ticket.price)
        .bind(ticket.max_quantity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(e, "Duplicate ticket category in request")
        })?;
        ticket_types.push(ticket_type);
    }

    tx.commit().await?;

    Ok(created(
        CreatedEvent {
            event,
            ticket_types,
        },
        "Event created successfully",
    )
    .into_response())
}

/// Admin-only: cancels an active event and returns the confirmed bookings
/// with refund amounts for the external refund workflow.
pub async fn cancel_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let bookings = lifecycle::cancel_event(&state.pool, auth, event_id).await?;
    Ok(success(bookings, "Event cancelled successfully").into_response())
}

/// Organizer/admin: confirmed bookings for an event with refund amounts.
pub async fn event_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let bookings = inventory::confirmed_bookings_for_event(&state.pool, auth, event_id).await?;
    Ok(success(bookings, "Bookings fetched successfully").into_response())
}
