use std::sync::Arc;

use rocket::{Build, Rocket};

use crate::repository::{BookingRepository, EventRepository};
use crate::store::{BookingStore, EventStore};

pub mod bookings;
pub mod events;

pub type Events = EventStore<Arc<dyn EventRepository>>;
pub type Bookings = BookingStore<Arc<dyn BookingRepository>, Arc<dyn EventRepository>>;

pub fn routes() -> Vec<rocket::Route> {
    let mut routes = events::routes();
    routes.extend(bookings::routes());
    routes
}

/// Rocket instance serving both stores under `/api`.
pub fn build(
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
) -> Rocket<Build> {
    rocket::build()
        .manage(EventStore::new(Arc::clone(&events)))
        .manage(BookingStore::new(bookings, events))
        .mount("/api", routes())
}
