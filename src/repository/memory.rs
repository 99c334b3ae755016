//! In-memory repositories used by the store tests. They enforce the same
//! uniqueness rules as the MongoDB indexes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::{BookingRepository, EventRepository};
use crate::error::{DataError, DataResult};
use crate::models::{Booking, Event};

#[derive(Clone, Default)]
pub struct MemoryEventRepository {
    events: Arc<Mutex<Vec<Event>>>,
    unreachable: Arc<AtomicBool>,
}

impl MemoryEventRepository {
    /// Makes every read fail as if the database could not be reached.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    fn check_reachable(&self) -> DataResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(DataError::ConnectionFailure("event store unreachable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn insert(&self, event: &Event) -> DataResult<ObjectId> {
        self.check_reachable()?;
        let mut events = self.events.lock().unwrap();
        if events.iter().any(|e| e.slug == event.slug) {
            return Err(DataError::DuplicateSlug(event.slug.clone()));
        }
        let id = ObjectId::new();
        let mut stored = event.clone();
        stored.id = Some(id);
        events.push(stored);
        Ok(id)
    }

    async fn replace(&self, event: &Event) -> DataResult<()> {
        self.check_reachable()?;
        let id = event.id.ok_or_else(|| DataError::NotFound("event".into()))?;
        let mut events = self.events.lock().unwrap();
        if events
            .iter()
            .any(|e| e.slug == event.slug && e.id != Some(id))
        {
            return Err(DataError::DuplicateSlug(event.slug.clone()));
        }
        let slot = events
            .iter_mut()
            .find(|e| e.id == Some(id))
            .ok_or_else(|| DataError::NotFound(format!("event {}", id.to_hex())))?;
        *slot = event.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Event>> {
        self.check_reachable()?;
        let events = self.events.lock().unwrap();
        Ok(events.iter().find(|e| e.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> DataResult<Option<Event>> {
        self.check_reachable()?;
        let events = self.events.lock().unwrap();
        Ok(events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn exists_by_id(&self, id: &ObjectId) -> DataResult<bool> {
        self.check_reachable()?;
        let events = self.events.lock().unwrap();
        Ok(events.iter().any(|e| e.id.as_ref() == Some(id)))
    }

    async fn list(&self) -> DataResult<Vec<Event>> {
        self.check_reachable()?;
        let mut events = self.events.lock().unwrap().clone();
        events.reverse();
        Ok(events)
    }
}

#[derive(Clone, Default)]
pub struct MemoryBookingRepository {
    bookings: Arc<Mutex<Vec<Booking>>>,
}

impl MemoryBookingRepository {
    pub fn len(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> DataResult<ObjectId> {
        let mut bookings = self.bookings.lock().unwrap();
        if bookings
            .iter()
            .any(|b| b.event_id == booking.event_id && b.email == booking.email)
        {
            return Err(DataError::DuplicateBooking);
        }
        let id = ObjectId::new();
        let mut stored = booking.clone();
        stored.id = Some(id);
        bookings.push(stored);
        Ok(id)
    }

    async fn replace(&self, booking: &Booking) -> DataResult<()> {
        let id = booking
            .id
            .ok_or_else(|| DataError::NotFound("booking".into()))?;
        let mut bookings = self.bookings.lock().unwrap();
        if bookings.iter().any(|b| {
            b.event_id == booking.event_id && b.email == booking.email && b.id != Some(id)
        }) {
            return Err(DataError::DuplicateBooking);
        }
        let slot = bookings
            .iter_mut()
            .find(|b| b.id == Some(id))
            .ok_or_else(|| DataError::NotFound(format!("booking {}", id.to_hex())))?;
        *slot = booking.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().find(|b| b.id.as_ref() == Some(id)).cloned())
    }

    async fn list_for_event(&self, event_id: &ObjectId) -> DataResult<Vec<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .rev()
            .filter(|b| &b.event_id == event_id)
            .cloned()
            .collect())
    }
}
