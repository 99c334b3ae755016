//! Validate-then-commit pipelines. Each write runs the pure checks from
//! [`crate::models`] first and only reaches the repository if they pass.

pub mod bookings;
pub mod events;

pub use bookings::BookingStore;
pub use events::EventStore;
