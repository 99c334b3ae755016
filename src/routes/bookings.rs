use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, patch, post, routes, State};

use super::{Bookings, Events};
use crate::error::DataResult;
use crate::models::{parse_object_id, Booking, BookingPatch, BookingPayload};

#[post("/bookings", data = "<payload>")]
pub async fn create_booking(
    bookings: &State<Bookings>,
    payload: Json<BookingPayload>,
) -> DataResult<Custom<Json<Booking>>> {
    let booking = bookings.create(&payload.event_id, &payload.email).await?;
    Ok(Custom(Status::Created, Json(booking)))
}

#[patch("/bookings/<id>", data = "<patch>")]
pub async fn update_booking(
    bookings: &State<Bookings>,
    id: &str,
    patch: Json<BookingPatch>,
) -> DataResult<Json<Booking>> {
    let id = parse_object_id(id)?;
    let patch = patch.into_inner();
    Ok(Json(bookings.update(&id, &patch).await?))
}

#[get("/events/<slug>/bookings")]
pub async fn event_bookings(
    events: &State<Events>,
    bookings: &State<Bookings>,
    slug: &str,
) -> DataResult<Json<Vec<Booking>>> {
    let event = events.find_by_slug(slug).await?;
    let Some(event_id) = event.id else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(bookings.list_for_event(&event_id).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_booking, update_booking, event_bookings]
}
