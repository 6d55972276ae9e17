//! Inventory ledger: category definition rules and confirmed-filtered
//! availability.
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

mod common;

use std::sync::Arc;

use chrono::Duration;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{as_user, seed_event, seed_ticket_type, seed_user, test_pool};
use eventhub_server::booking::{self, cancel};
use eventhub_server::inventory;
use eventhub_server::models::{
    BookingItemRequest, CreateBookingRequest, NewTicketType, UpdateTicketType,
};
use eventhub_server::notify::TracingNotifier;
use eventhub_server::utils::error::AppError;

fn new_type(category: &str, price: rust_decimal::Decimal, max_quantity: i32) -> NewTicketType {
    NewTicketType {
        category: category.to_string(),
        price,
        max_quantity,
    }
}

async fn book(pool: &sqlx::PgPool, user: Uuid, event: Uuid, category: &str, quantity: i32) -> Uuid {
    booking::create_booking(
        pool,
        Arc::new(TracingNotifier),
        as_user(user),
        CreateBookingRequest {
            event_id: event,
            items: vec![BookingItemRequest {
                category: category.to_string(),
                quantity,
            }],
            payment_method: "credit_card".to_string(),
        },
    )
    .await
    .unwrap()
    .booking
    .booking_id
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn duplicate_category_is_a_conflict() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool).await;
    let event = seed_event(&pool, organizer, Duration::days(1), Duration::days(2)).await;

    inventory::define_category(&pool, as_user(organizer), event, new_type("VIP", dec!(100), 10))
        .await
        .unwrap();
    let err = inventory::define_category(
        &pool,
        as_user(organizer),
        event,
        new_type("VIP", dec!(120), 20),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn only_the_organizer_or_admin_defines_categories() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool).await;
    let stranger = seed_user(&pool).await;
    let event = seed_event(&pool, organizer, Duration::days(1), Duration::days(2)).await;

    let err = inventory::define_category(
        &pool,
        as_user(stranger),
        event,
        new_type("VIP", dec!(100), 10),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = inventory::define_category(
        &pool,
        as_user(organizer),
        Uuid::new_v4(),
        new_type("VIP", dec!(100), 10),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn categories_freeze_once_tickets_are_sold() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool).await;
    let event = seed_event(&pool, organizer, Duration::days(1), Duration::days(2)).await;
    seed_ticket_type(&pool, event, "General", dec!(50.00), 20).await;

    // Before any sale the category is still mutable.
    inventory::update_category(
        &pool,
        as_user(organizer),
        event,
        "General",
        UpdateTicketType {
            price: Some(dec!(55.00)),
            max_quantity: None,
        },
    )
    .await
    .unwrap();

    book(&pool, organizer, event, "General", 1).await;

    let err = inventory::update_category(
        &pool,
        as_user(organizer),
        event,
        "General",
        UpdateTicketType {
            price: Some(dec!(60.00)),
            max_quantity: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = inventory::delete_category(&pool, as_user(organizer), event, "General")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn unsold_categories_can_be_deleted() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool).await;
    let event = seed_event(&pool, organizer, Duration::days(1), Duration::days(2)).await;
    seed_ticket_type(&pool, event, "EarlyBird", dec!(30.00), 5).await;

    inventory::delete_category(&pool, as_user(organizer), event, "EarlyBird")
        .await
        .unwrap();

    let availability = inventory::availability(&pool, event).await.unwrap();
    assert!(availability.is_empty());
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn availability_counts_confirmed_bookings_only() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool).await;
    let event = seed_event(&pool, organizer, Duration::days(1), Duration::days(2)).await;
    seed_ticket_type(&pool, event, "General", dec!(50.00), 10).await;

    let booking_id = book(&pool, organizer, event, "General", 4).await;

    let availability = inventory::availability(&pool, event).await.unwrap();
    assert_eq!(availability[0].sold_quantity, 4);
    assert_eq!(availability[0].available_quantity, 6);

    cancel::cancel_booking(&pool, Arc::new(TracingNotifier), as_user(organizer), booking_id)
        .await
        .unwrap();

    // The ticket rows still exist, but a cancelled booking frees capacity.
    let availability = inventory::availability(&pool, event).await.unwrap();
    assert_eq!(availability[0].sold_quantity, 0);
    assert_eq!(availability[0].available_quantity, 10);

    let freed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE event_id = $1")
        .bind(event)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(freed, 4);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn availability_is_listed_cheapest_first() {
    let pool = test_pool().await;
    let organizer = seed_user(&pool).await;
    let event = seed_event(&pool, organizer, Duration::days(1), Duration::days(2)).await;
    seed_ticket_type(&pool, event, "VIP", dec!(150.00), 5).await;
    seed_ticket_type(&pool, event, "General", dec!(50.00), 50).await;

    let availability = inventory::availability(&pool, event).await.unwrap();
    let categories: Vec<&str> = availability.iter().map(|a| a.category.as_str()).collect();
    assert_eq!(categories, ["General", "VIP"]);
}
