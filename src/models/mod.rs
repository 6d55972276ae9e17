pub mod booking;
pub mod event;
pub mod notification;
pub mod payment;
pub mod ticket;

pub use booking::{
    Booking, BookingConfirmation, BookingItemRequest, BookingStatus, BookingSummary,
    ConfirmedBookingSummary, CreateBookingRequest,
};
pub use event::{CreateEventRequest, Event, EventDetails, EventStatus};
pub use notification::Notification;
pub use payment::{Payment, PaymentStatus};
pub use ticket::{CategoryAvailability, NewTicketType, Ticket, TicketType, UpdateTicketType};
