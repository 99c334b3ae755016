use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::utils::{normalize_date, normalize_time, slugify};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventMode::Online => write!(f, "online"),
            EventMode::Offline => write!(f, "offline"),
            EventMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for EventMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "online" => Ok(EventMode::Online),
            "offline" => Ok(EventMode::Offline),
            "hybrid" => Ok(EventMode::Hybrid),
            other => Err(DataError::InvalidEnumValue {
                field: "mode",
                value: other.to_string(),
            }),
        }
    }
}

/// A persisted event. Every instance produced by this crate is already
/// validated: `slug`, `date` and `time` hold their canonical forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an event. `mode` stays a string until validated;
/// absent fields deserialize as empty so they are reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn required(field: &'static str, value: &str) -> DataResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DataError::RequiredFieldMissing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_empty_list(field: &'static str, values: &[String]) -> DataResult<Vec<String>> {
    if values.is_empty() {
        return Err(DataError::EmptyListField(field));
    }
    Ok(values.iter().map(|v| v.trim().to_string()).collect())
}

fn derive_slug(title: &str) -> DataResult<String> {
    let slug = slugify(title);
    if slug.is_empty() {
        Err(DataError::EmptySlug(title.to_string()))
    } else {
        Ok(slug)
    }
}

/// Field checks shared by create and update, in the order errors are reported.
struct CheckedFields {
    title: String,
    description: String,
    overview: String,
    image: String,
    venue: String,
    location: String,
    date: String,
    time: String,
    mode: EventMode,
    audience: String,
    agenda: Vec<String>,
    organizer: String,
    tags: Vec<String>,
}

impl CheckedFields {
    fn check(payload: &EventPayload) -> DataResult<Self> {
        let fields = CheckedFields {
            title: required("title", &payload.title)?,
            description: required("description", &payload.description)?,
            overview: required("overview", &payload.overview)?,
            image: required("image", &payload.image)?,
            venue: required("venue", &payload.venue)?,
            location: required("location", &payload.location)?,
            date: required("date", &payload.date)?,
            time: required("time", &payload.time)?,
            mode: required("mode", &payload.mode)?.parse()?,
            audience: required("audience", &payload.audience)?,
            organizer: required("organizer", &payload.organizer)?,
            agenda: non_empty_list("agenda", &payload.agenda)?,
            tags: non_empty_list("tags", &payload.tags)?,
        };
        Ok(fields)
    }
}

impl Event {
    /// Validates a new event and derives its slug, date and time.
    pub fn from_payload(payload: &EventPayload, now: DateTime<Utc>) -> DataResult<Event> {
        let fields = CheckedFields::check(payload)?;
        Ok(Event {
            id: None,
            slug: derive_slug(&fields.title)?,
            date: normalize_date(&fields.date)?,
            time: normalize_time(&fields.time)?,
            title: fields.title,
            description: fields.description,
            overview: fields.overview,
            image: fields.image,
            venue: fields.venue,
            location: fields.location,
            mode: fields.mode,
            audience: fields.audience,
            agenda: fields.agenda,
            organizer: fields.organizer,
            tags: fields.tags,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges `patch` over this event and re-validates the result.
    ///
    /// The slug is only regenerated when the title changes (or the slug is
    /// empty), and date/time are only re-normalized when they change, so
    /// stored canonical values are never rewritten by unrelated edits.
    pub fn apply_patch(&self, patch: &EventPatch, now: DateTime<Utc>) -> DataResult<Event> {
        let merged = EventPayload {
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            overview: patch.overview.clone().unwrap_or_else(|| self.overview.clone()),
            image: patch.image.clone().unwrap_or_else(|| self.image.clone()),
            venue: patch.venue.clone().unwrap_or_else(|| self.venue.clone()),
            location: patch.location.clone().unwrap_or_else(|| self.location.clone()),
            date: patch.date.clone().unwrap_or_else(|| self.date.clone()),
            time: patch.time.clone().unwrap_or_else(|| self.time.clone()),
            mode: patch.mode.clone().unwrap_or_else(|| self.mode.to_string()),
            audience: patch.audience.clone().unwrap_or_else(|| self.audience.clone()),
            agenda: patch.agenda.clone().unwrap_or_else(|| self.agenda.clone()),
            organizer: patch
                .organizer
                .clone()
                .unwrap_or_else(|| self.organizer.clone()),
            tags: patch.tags.clone().unwrap_or_else(|| self.tags.clone()),
        };
        let fields = CheckedFields::check(&merged)?;

        let slug = if fields.title != self.title || self.slug.is_empty() {
            derive_slug(&fields.title)?
        } else {
            self.slug.clone()
        };
        let date = if fields.date != self.date {
            normalize_date(&fields.date)?
        } else {
            self.date.clone()
        };
        let time = if fields.time != self.time {
            normalize_time(&fields.time)?
        } else {
            self.time.clone()
        };

        Ok(Event {
            id: self.id,
            slug,
            date,
            time,
            title: fields.title,
            description: fields.description,
            overview: fields.overview,
            image: fields.image,
            venue: fields.venue,
            location: fields.location,
            mode: fields.mode,
            audience: fields.audience,
            agenda: fields.agenda,
            organizer: fields.organizer,
            tags: fields.tags,
            created_at: self.created_at,
            updated_at: now,
        })
    }
}
