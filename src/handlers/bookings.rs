use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::booking;
use crate::models::CreateBookingRequest;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Response, AppError> {
    let confirmation =
        booking::create_booking(&state.pool, state.notifier.clone(), auth, req).await?;
    Ok(created(confirmation, "Booking created successfully").into_response())
}

pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let bookings = booking::list_bookings(&state.pool, auth).await?;
    Ok(success(bookings, "Bookings fetched successfully").into_response())
}

pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let booking = booking::get_booking(&state.pool, auth, booking_id).await?;
    Ok(success(booking, "Booking fetched successfully").into_response())
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    booking::cancel::cancel_booking(&state.pool, state.notifier.clone(), auth, booking_id).await?;
    Ok(empty_success("Booking cancelled successfully").into_response())
}
