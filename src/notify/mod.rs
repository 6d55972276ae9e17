//! Outbound notification boundary. The core emits delivery requests through
//! the [`Notifier`] trait and never waits on them; templates and transport
//! belong to the delivery service behind this port.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

#[derive(Debug, Clone)]
pub struct BookingConfirmedNotice {
    pub user_id: Uuid,
    pub booking_id: Uuid,
    pub event_title: String,
    pub ticket_count: usize,
    pub total_amount: Decimal,
    pub payment_method: String,
}

#[derive(Debug, Clone)]
pub struct BookingCancelledNotice {
    pub user_id: Uuid,
    pub booking_id: Uuid,
    pub event_title: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_confirmed(&self, notice: BookingConfirmedNotice) -> Result<(), NotifyError>;

    async fn booking_cancelled(&self, notice: BookingCancelledNotice) -> Result<(), NotifyError>;
}

/// Default wiring: records the delivery request in the log stream, where the
/// external delivery worker picks it up. Keeps the request path free of any
/// transport dependency.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn booking_confirmed(&self, notice: BookingConfirmedNotice) -> Result<(), NotifyError> {
        info!(
            user_id = %notice.user_id,
            booking_id = %notice.booking_id,
            event_title = %notice.event_title,
            ticket_count = notice.ticket_count,
            total_amount = %notice.total_amount,
            payment_method = %notice.payment_method,
            "Booking confirmation queued for delivery"
        );
        Ok(())
    }

    async fn booking_cancelled(&self, notice: BookingCancelledNotice) -> Result<(), NotifyError> {
        info!(
            user_id = %notice.user_id,
            booking_id = %notice.booking_id,
            event_title = %notice.event_title,
            "Cancellation notice queued for delivery"
        );
        Ok(())
    }
}

/// Fire-and-forget dispatch of a confirmation. Failures are logged and never
/// reach the request that triggered them.
pub fn dispatch_confirmation(notifier: Arc<dyn Notifier>, notice: BookingConfirmedNotice) {
    tokio::spawn(async move {
        let booking_id = notice.booking_id;
        if let Err(e) = notifier.booking_confirmed(notice).await {
            warn!(error = %e, booking_id = %booking_id, "Failed to send booking confirmation");
        }
    });
}

/// Fire-and-forget dispatch of a cancellation notice.
pub fn dispatch_cancellation(notifier: Arc<dyn Notifier>, notice: BookingCancelledNotice) {
    tokio::spawn(async move {
        let booking_id = notice.booking_id;
        if let Err(e) = notifier.booking_cancelled(notice).await {
            warn!(error = %e, booking_id = %booking_id, "Failed to send cancellation notice");
        }
    });
}
