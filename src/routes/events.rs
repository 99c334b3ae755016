use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, patch, post, routes, State};

use super::Events;
use crate::error::DataResult;
use crate::models::{parse_object_id, Event, EventPatch, EventPayload};

#[get("/events")]
pub async fn list_events(events: &State<Events>) -> DataResult<Json<Vec<Event>>> {
    Ok(Json(events.list().await?))
}

#[get("/events/<slug>")]
pub async fn get_event(events: &State<Events>, slug: &str) -> DataResult<Json<Event>> {
    Ok(Json(events.find_by_slug(slug).await?))
}

#[post("/events", data = "<payload>")]
pub async fn create_event(
    events: &State<Events>,
    payload: Json<EventPayload>,
) -> DataResult<Custom<Json<Event>>> {
    let payload = payload.into_inner();
    let event = events.create(&payload).await?;
    Ok(Custom(Status::Created, Json(event)))
}

#[patch("/events/<id>", data = "<patch>")]
pub async fn update_event(
    events: &State<Events>,
    id: &str,
    patch: Json<EventPatch>,
) -> DataResult<Json<Event>> {
    let id = parse_object_id(id)?;
    let patch = patch.into_inner();
    Ok(Json(events.update(&id, &patch).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_events, get_event, create_event, update_event]
}
