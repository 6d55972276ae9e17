//! Shared fixtures for the database-backed integration suites. Every test
//! seeds its own rows with fresh UUIDs, so the suites can share one scratch
//! database.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use eventhub_server::auth::{AuthUser, Role};
use eventhub_server::notify::{
    BookingCancelledNotice, BookingConfirmedNotice, Notifier, NotifyError,
};

pub async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a scratch database for integration tests");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn as_user(user_id: Uuid) -> AuthUser {
    AuthUser {
        user_id,
        role: Role::User,
    }
}

pub fn as_admin(user_id: Uuid) -> AuthUser {
    AuthUser {
        user_id,
        role: Role::Admin,
    }
}

pub async fn seed_user(pool: &PgPool) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING user_id",
    )
    .bind("Test User")
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

/// Seeds a venue, category, and event in one go. Offsets are relative to
/// now, so negative values produce an event already in the past.
pub async fn seed_event(
    pool: &PgPool,
    organizer_id: Uuid,
    starts_in: Duration,
    ends_in: Duration,
) -> Uuid {
    let venue_id: Uuid =
        sqlx::query_scalar("INSERT INTO venues (name, city) VALUES ($1, $2) RETURNING venue_id")
            .bind("Test Hall")
            .bind("Test City")
            .fetch_one(pool)
            .await
            .expect("Failed to seed venue");

    let category_id: Uuid =
        sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING category_id")
            .bind(format!("genre-{}", Uuid::new_v4()))
            .fetch_one(pool)
            .await
            .expect("Failed to seed category");

    let now = Utc::now();
    seed_event_at(pool, organizer_id, venue_id, category_id, now + starts_in, now + ends_in).await
}

pub async fn seed_event_at(
    pool: &PgPool,
    organizer_id: Uuid,
    venue_id: Uuid,
    category_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO events (organizer_id, venue_id, category_id, title, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING event_id
        "#,
    )
    .bind(organizer_id)
    .bind(venue_id)
    .bind(category_id)
    .bind("Test Event")
    .bind(start_date)
    .bind(end_date)
    .fetch_one(pool)
    .await
    .expect("Failed to seed event")
}

pub async fn seed_ticket_type(
    pool: &PgPool,
    event_id: Uuid,
    category: &str,
    price: Decimal,
    max_quantity: i32,
) {
    sqlx::query(
        "INSERT INTO ticket_types (event_id, category, price, max_quantity) VALUES ($1, $2, $3, $4)",
    )
    .bind(event_id)
    .bind(category)
    .bind(price)
    .bind(max_quantity)
    .execute(pool)
    .await
    .expect("Failed to seed ticket type");
}

/// A notifier whose delivery always fails, for asserting that the port
/// boundary never leaks into the booking result.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn booking_confirmed(&self, _: BookingConfirmedNotice) -> Result<(), NotifyError> {
        Err(NotifyError("delivery worker unreachable".to_string()))
    }

    async fn booking_cancelled(&self, _: BookingCancelledNotice) -> Result<(), NotifyError> {
        Err(NotifyError("delivery worker unreachable".to_string()))
    }
}
