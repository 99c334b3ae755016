use chrono::Utc;
use log::{debug, info};
use mongodb::bson::oid::ObjectId;

use crate::error::{DataError, DataResult};
use crate::models::{Event, EventPatch, EventPayload};
use crate::repository::EventRepository;

#[derive(Clone)]
pub struct EventStore<R> {
    repo: R,
}

impl<R: EventRepository> EventStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn create(&self, payload: &EventPayload) -> DataResult<Event> {
        let mut event = Event::from_payload(payload, Utc::now()).map_err(|e| {
            debug!("Rejected new event {:?}: {}", payload.title, e);
            e
        })?;
        let id = self.repo.insert(&event).await?;
        event.id = Some(id);
        info!("Created event {} ({})", event.slug, id.to_hex());
        Ok(event)
    }

    pub async fn update(&self, id: &ObjectId, patch: &EventPatch) -> DataResult<Event> {
        let current = self.find_by_id(id).await?;
        let updated = current.apply_patch(patch, Utc::now()).map_err(|e| {
            debug!("Rejected update to event {}: {}", id.to_hex(), e);
            e
        })?;
        self.repo.replace(&updated).await?;
        info!("Updated event {} ({})", updated.slug, id.to_hex());
        Ok(updated)
    }

    pub async fn exists_by_id(&self, id: &ObjectId) -> DataResult<bool> {
        self.repo.exists_by_id(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> DataResult<Event> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DataError::NotFound(format!("event `{slug}`")))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> DataResult<Event> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DataError::NotFound(format!("event {}", id.to_hex())))
    }

    pub async fn list(&self) -> DataResult<Vec<Event>> {
        self.repo.list().await
    }
}
