use mongodb::bson::oid::ObjectId;

use crate::error::{DataError, DataResult};

pub mod booking;
pub mod event;

pub use booking::{Booking, BookingPatch, BookingPayload};
pub use event::{Event, EventMode, EventPatch, EventPayload};

pub fn parse_object_id(id: &str) -> DataResult<ObjectId> {
    ObjectId::parse_str(id.trim()).map_err(|_| DataError::InvalidId(id.trim().to_string()))
}
