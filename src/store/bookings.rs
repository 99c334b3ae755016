use chrono::Utc;
use log::{debug, error, info};
use mongodb::bson::oid::ObjectId;

use crate::error::{DataError, DataResult};
use crate::models::{Booking, BookingPatch, BookingPayload};
use crate::repository::{BookingRepository, EventRepository};

#[derive(Clone)]
pub struct BookingStore<B, E> {
    bookings: B,
    events: E,
}

impl<B: BookingRepository, E: EventRepository> BookingStore<B, E> {
    pub fn new(bookings: B, events: E) -> Self {
        Self { bookings, events }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &B {
        &self.bookings
    }

    /// One read against the event store, not retried. A failed read is kept
    /// distinct from a confirmed missing event.
    async fn ensure_event_exists(&self, event_id: &ObjectId) -> DataResult<()> {
        match self.events.exists_by_id(event_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DataError::DanglingReference(event_id.to_hex())),
            Err(e) => {
                error!("Could not check event {}: {}", event_id.to_hex(), e);
                Err(DataError::ReferenceCheckFailed(Box::new(e)))
            }
        }
    }

    pub async fn create(&self, event_id: &str, email: &str) -> DataResult<Booking> {
        let payload = BookingPayload {
            event_id: event_id.to_string(),
            email: email.to_string(),
        };
        let mut booking = Booking::from_payload(&payload, Utc::now()).map_err(|e| {
            debug!("Rejected booking for event {}: {}", event_id, e);
            e
        })?;
        self.ensure_event_exists(&booking.event_id).await?;

        let id = self.bookings.insert(&booking).await?;
        booking.id = Some(id);
        info!(
            "Created booking {} for event {}",
            id.to_hex(),
            booking.event_id.to_hex()
        );
        Ok(booking)
    }

    pub async fn update(&self, id: &ObjectId, patch: &BookingPatch) -> DataResult<Booking> {
        let current = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| DataError::NotFound(format!("booking {}", id.to_hex())))?;

        let (updated, moved) = current.apply_patch(patch, Utc::now())?;
        if moved {
            self.ensure_event_exists(&updated.event_id).await?;
        }

        self.bookings.replace(&updated).await?;
        info!("Updated booking {}", id.to_hex());
        Ok(updated)
    }

    pub async fn list_for_event(&self, event_id: &ObjectId) -> DataResult<Vec<Booking>> {
        self.bookings.list_for_event(event_id).await
    }
}
