use async_trait::async_trait;
use futures::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{CountOptions, FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};

use super::{BookingRepository, EventRepository};
use crate::error::{DataError, DataResult};
use crate::models::{Booking, Event};

const EVENTS: &str = "events";
const BOOKINGS: &str = "bookings";
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn inserted_id(id: mongodb::bson::Bson) -> DataResult<ObjectId> {
    id.as_object_id()
        .ok_or_else(|| DataError::InvalidId(id.to_string()))
}

#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(EVENTS),
        }
    }

    pub async fn ensure_indexes(&self) -> DataResult<()> {
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(slug_index, None).await?;
        info!("Ensured indexes on {}", EVENTS);
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    async fn insert(&self, event: &Event) -> DataResult<ObjectId> {
        let result = self
            .collection
            .insert_one(event, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    DataError::DuplicateSlug(event.slug.clone())
                } else {
                    DataError::Database(e)
                }
            })?;
        inserted_id(result.inserted_id)
    }

    async fn replace(&self, event: &Event) -> DataResult<()> {
        let id = event
            .id
            .ok_or_else(|| DataError::NotFound("event".to_string()))?;
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, event, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    DataError::DuplicateSlug(event.slug.clone())
                } else {
                    DataError::Database(e)
                }
            })?;
        if result.matched_count == 0 {
            return Err(DataError::NotFound(format!("event {}", id.to_hex())));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Event>> {
        Ok(self.collection.find_one(doc! { "_id": *id }, None).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> DataResult<Option<Event>> {
        Ok(self.collection.find_one(doc! { "slug": slug }, None).await?)
    }

    async fn exists_by_id(&self, id: &ObjectId) -> DataResult<bool> {
        let options = CountOptions::builder().limit(1).build();
        let count = self
            .collection
            .count_documents(doc! { "_id": *id }, options)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self) -> DataResult<Vec<Event>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.collection.find(doc! {}, find_options).await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }
}

#[derive(Clone)]
pub struct MongoBookingRepository {
    collection: Collection<Booking>,
}

impl MongoBookingRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(BOOKINGS),
        }
    }

    pub async fn ensure_indexes(&self) -> DataResult<()> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "event_id": 1, "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let event_index = IndexModel::builder().keys(doc! { "event_id": 1 }).build();
        self.collection
            .create_indexes([pair_index, event_index], None)
            .await?;
        info!("Ensured indexes on {}", BOOKINGS);
        Ok(())
    }
}

fn booking_write_error(e: MongoError) -> DataError {
    if is_duplicate_key(&e) {
        DataError::DuplicateBooking
    } else {
        DataError::Database(e)
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    async fn insert(&self, booking: &Booking) -> DataResult<ObjectId> {
        let result = self
            .collection
            .insert_one(booking, None)
            .await
            .map_err(booking_write_error)?;
        inserted_id(result.inserted_id)
    }

    async fn replace(&self, booking: &Booking) -> DataResult<()> {
        let id = booking
            .id
            .ok_or_else(|| DataError::NotFound("booking".to_string()))?;
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, booking, None)
            .await
            .map_err(booking_write_error)?;
        if result.matched_count == 0 {
            return Err(DataError::NotFound(format!("booking {}", id.to_hex())));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> DataResult<Option<Booking>> {
        Ok(self.collection.find_one(doc! { "_id": *id }, None).await?)
    }

    async fn list_for_event(&self, event_id: &ObjectId) -> DataResult<Vec<Booking>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .collection
            .find(doc! { "event_id": *event_id }, find_options)
            .await?;
        let bookings: Vec<Booking> = cursor.try_collect().await?;
        Ok(bookings)
    }
}
