use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketType {
    pub event_id: Uuid,
    pub category: String,
    pub price: Decimal,
    pub max_quantity: i32,
}

/// One issued unit of a ticket type. Rows are append-only; cancellation
/// leaves them in place and availability is derived from booking status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub ticket_id: Uuid,
    pub event_id: Uuid,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTicketType {
    pub category: String,
    pub price: Decimal,
    pub max_quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketType {
    pub price: Option<Decimal>,
    pub max_quantity: Option<i32>,
}

/// Per-category availability view. `sold_quantity` counts only tickets whose
/// owning booking is still confirmed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryAvailability {
    pub category: String,
    pub price: Decimal,
    pub max_quantity: i32,
    pub sold_quantity: i32,
    pub available_quantity: i32,
}
