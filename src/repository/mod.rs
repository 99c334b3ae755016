//! Persistence primitives. Implementations store records as given; all
//! validation happens in [`crate::store`] before these are called.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::DataResult;
use crate::models::{Booking, Event};

#[cfg(test)]
pub mod memory;
pub mod mongo;

pub use mongo::{MongoBookingRepository, MongoEventRepository};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fails with `DuplicateSlug` if another event already uses the slug.
    async fn insert(&self, event: &Event) -> DataResult<ObjectId>;
    async fn replace(&self, event: &Event) -> DataResult<()>;
    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Event>>;
    async fn find_by_slug(&self, slug: &str) -> DataResult<Option<Event>>;
    async fn exists_by_id(&self, id: &ObjectId) -> DataResult<bool>;
    /// Newest first.
    async fn list(&self) -> DataResult<Vec<Event>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with `DuplicateBooking` if the (event, email) pair is taken.
    async fn insert(&self, booking: &Booking) -> DataResult<ObjectId>;
    async fn replace(&self, booking: &Booking) -> DataResult<()>;
    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Booking>>;
    async fn list_for_event(&self, event_id: &ObjectId) -> DataResult<Vec<Booking>>;
}

#[async_trait]
impl<T: EventRepository + ?Sized> EventRepository for Arc<T> {
    async fn insert(&self, event: &Event) -> DataResult<ObjectId> {
        (**self).insert(event).await
    }

    async fn replace(&self, event: &Event) -> DataResult<()> {
        (**self).replace(event).await
    }

    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Event>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> DataResult<Option<Event>> {
        (**self).find_by_slug(slug).await
    }

    async fn exists_by_id(&self, id: &ObjectId) -> DataResult<bool> {
        (**self).exists_by_id(id).await
    }

    async fn list(&self) -> DataResult<Vec<Event>> {
        (**self).list().await
    }
}

#[async_trait]
impl<T: BookingRepository + ?Sized> BookingRepository for Arc<T> {
    async fn insert(&self, booking: &Booking) -> DataResult<ObjectId> {
        (**self).insert(booking).await
    }

    async fn replace(&self, booking: &Booking) -> DataResult<()> {
        (**self).replace(booking).await
    }

    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Booking>> {
        (**self).find_by_id(id).await
    }

    async fn list_for_event(&self, event_id: &ObjectId) -> DataResult<Vec<Booking>> {
        (**self).list_for_event(event_id).await
    }
}
