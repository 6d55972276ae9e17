use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::inventory;
use crate::models::{NewTicketType, UpdateTicketType};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

/// Public availability read for one event.
pub async fn event_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT event_id FROM events WHERE event_id = $1")
        .bind(event_id)
        .fetch_optional(&state.pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    let tickets = inventory::availability(&state.pool, event_id).await?;
    Ok(success(tickets, "Tickets fetched successfully").into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketTypeRequest {
    pub event_id: Uuid,
    #[serde(flatten)]
    pub ticket: NewTicketType,
}

pub async fn create_ticket_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTicketTypeRequest>,
) -> Result<Response, AppError> {
    let ticket_type =
        inventory::define_category(&state.pool, auth, req.event_id, req.ticket).await?;
    Ok(created(ticket_type, "Ticket type created successfully").into_response())
}

pub async fn update_ticket_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((event_id, category)): Path<(Uuid, String)>,
    Json(update): Json<UpdateTicketType>,
) -> Result<Response, AppError> {
    let ticket_type =
        inventory::update_category(&state.pool, auth, event_id, &category, update).await?;
    Ok(success(ticket_type, "Ticket type updated successfully").into_response())
}

pub async fn delete_ticket_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((event_id, category)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    inventory::delete_category(&state.pool, auth, event_id, &category).await?;
    Ok(empty_success("Ticket type deleted successfully").into_response())
}
