use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use super::parse_object_id;
use crate::error::DataResult;
use crate::utils::normalize_email;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub event_id: ObjectId,
    pub email: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingPayload {
    pub event_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub event_id: Option<String>,
    pub email: Option<String>,
}

impl Booking {
    /// Checks the shape of a new booking. Whether the event exists is the
    /// store's job, since it needs a round trip.
    pub fn from_payload(payload: &BookingPayload, now: DateTime<Utc>) -> DataResult<Booking> {
        let email = normalize_email(&payload.email)?;
        let event_id = parse_object_id(&payload.event_id)?;
        Ok(Booking {
            id: None,
            event_id,
            email,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the merged booking and whether the event reference moved.
    pub fn apply_patch(
        &self,
        patch: &BookingPatch,
        now: DateTime<Utc>,
    ) -> DataResult<(Booking, bool)> {
        let email = match &patch.email {
            Some(email) => normalize_email(email)?,
            None => self.email.clone(),
        };
        let event_id = match &patch.event_id {
            Some(id) => parse_object_id(id)?,
            None => self.event_id,
        };
        let moved = event_id != self.event_id;
        Ok((
            Booking {
                id: self.id,
                event_id,
                email,
                created_at: self.created_at,
                updated_at: now,
            },
            moved,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use mongodb::bson::{self, Bson};

    #[test]
    fn payload_is_normalized() {
        let event_id = ObjectId::new();
        let payload = BookingPayload {
            event_id: event_id.to_hex(),
            email: " Grace@Example.org ".into(),
        };
        let booking = Booking::from_payload(&payload, Utc::now()).unwrap();
        assert_eq!(booking.event_id, event_id);
        assert_eq!(booking.email, "grace@example.org");
    }

    #[test]
    fn email_is_checked_before_the_id() {
        let payload = BookingPayload {
            event_id: "nope".into(),
            email: "not-an-email".into(),
        };
        assert!(matches!(
            Booking::from_payload(&payload, Utc::now()),
            Err(DataError::InvalidEmail(_))
        ));
    }

    #[test]
    fn malformed_event_id_is_rejected() {
        let payload = BookingPayload {
            event_id: "12345".into(),
            email: "a@b.io".into(),
        };
        assert!(matches!(
            Booking::from_payload(&payload, Utc::now()),
            Err(DataError::InvalidId(_))
        ));
    }

    #[test]
    fn patch_reports_event_move() {
        let booking = Booking::from_payload(
            &BookingPayload {
                event_id: ObjectId::new().to_hex(),
                email: "a@b.io".into(),
            },
            Utc::now(),
        )
        .unwrap();

        let (same, moved) = booking
            .apply_patch(
                &BookingPatch {
                    email: Some("C@D.io".into()),
                    ..BookingPatch::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(!moved);
        assert_eq!(same.email, "c@d.io");

        let (_, moved) = booking
            .apply_patch(
                &BookingPatch {
                    event_id: Some(booking.event_id.to_hex()),
                    ..BookingPatch::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(!moved);

        let (_, moved) = booking
            .apply_patch(
                &BookingPatch {
                    event_id: Some(ObjectId::new().to_hex()),
                    ..BookingPatch::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(moved);
    }

    #[test]
    fn timestamps_are_stored_as_bson_dates() {
        let now = DateTime::<Utc>::from_timestamp_millis(1_741_170_000_123).unwrap();
        let booking = Booking::from_payload(
            &BookingPayload {
                event_id: ObjectId::new().to_hex(),
                email: "a@b.io".into(),
            },
            now,
        )
        .unwrap();

        let doc = bson::to_document(&booking).unwrap();
        assert!(matches!(doc.get("created_at"), Some(Bson::DateTime(_))));
        assert!(matches!(doc.get("updated_at"), Some(Bson::DateTime(_))));
        let back: Booking = bson::from_document(doc).unwrap();
        assert_eq!(back, booking);
    }
}
