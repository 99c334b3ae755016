use anyhow::Context;
use dotenvy::dotenv;
use env_logger::Env;
use log::info;
use std::sync::Arc;

use event_booking::config::Config;
use event_booking::db::init_db;
use event_booking::repository::{MongoBookingRepository, MongoEventRepository};
use event_booking::routes;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("invalid configuration")?;
    let db = init_db(&config).await?;

    let event_repo = MongoEventRepository::new(&db);
    let booking_repo = MongoBookingRepository::new(&db);
    event_repo.ensure_indexes().await?;
    booking_repo.ensure_indexes().await?;

    info!("Serving events and bookings from {}", config.database_name);

    routes::build(Arc::new(event_repo), Arc::new(booking_repo))
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}
