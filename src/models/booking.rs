use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::payment::Payment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingItemRequest {
    pub category: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: Uuid,
    pub items: Vec<BookingItemRequest>,
    pub payment_method: String,
}

/// Result of a successful purchase: the committed booking header plus the
/// payment written alongside it.
#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    #[serde(flatten)]
    pub booking: Booking,
    pub total_amount: Decimal,
    pub payment: Payment,
    pub event_title: String,
}

/// One row of the caller's booking list, with its items aggregated to JSON
/// by the query.
#[derive(Debug, Serialize, FromRow)]
pub struct BookingSummary {
    pub booking_id: Uuid,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub event_id: Uuid,
    pub event_title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub total_amount: Decimal,
    pub items: Value,
}

/// Confirmed booking with its refund exposure, consumed by the external
/// bulk-refund workflow when an event is cancelled.
#[derive(Debug, Serialize, FromRow)]
pub struct ConfirmedBookingSummary {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub booking_date: DateTime<Utc>,
    pub ticket_count: i64,
    pub refund_amount: Decimal,
}
