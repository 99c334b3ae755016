use anyhow::Context;
use dotenvy::dotenv;
use env_logger::Env;
use log::info;

use event_booking::config::Config;
use event_booking::db::init_db;
use event_booking::models::EventPayload;
use event_booking::repository::{MongoBookingRepository, MongoEventRepository};
use event_booking::store::EventStore;
use event_booking::DataError;

fn sample_events() -> Vec<EventPayload> {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    vec![
        EventPayload {
            title: "React Summit 2025".to_string(),
            description: "The biggest React conference worldwide.".to_string(),
            overview: "Two days of talks, workshops and networking for React developers.".to_string(),
            image: "/images/event1.png".to_string(),
            venue: "Kromhouthal".to_string(),
            location: "Amsterdam, Netherlands".to_string(),
            date: "June 13, 2025".to_string(),
            time: "9:00 AM".to_string(),
            mode: "hybrid".to_string(),
            audience: "Frontend engineers".to_string(),
            agenda: strings(&["09:00 Registration", "10:00 Keynote", "13:00 Workshops"]),
            organizer: "GitNation".to_string(),
            tags: strings(&["react", "frontend", "javascript"]),
        },
        EventPayload {
            title: "RustConf".to_string(),
            description: "The official annual Rust conference.".to_string(),
            overview: "Talks on the language, the ecosystem and the community.".to_string(),
            image: "/images/event2.png".to_string(),
            venue: "Palais des congres".to_string(),
            location: "Montreal, Canada".to_string(),
            date: "2025-09-02".to_string(),
            time: "10:30".to_string(),
            mode: "offline".to_string(),
            audience: "Rust developers".to_string(),
            agenda: strings(&["10:30 Opening", "11:00 Talks", "17:00 Closing"]),
            organizer: "Rust Foundation".to_string(),
            tags: strings(&["rust", "systems"]),
        },
        EventPayload {
            title: "Cloud Native Hack Night".to_string(),
            description: "An evening of hacking on Kubernetes tooling.".to_string(),
            overview: "Bring a laptop and pair up with maintainers.".to_string(),
            image: "/images/event3.png".to_string(),
            venue: "Online".to_string(),
            location: "Worldwide".to_string(),
            date: "2025-10-15T18:00:00Z".to_string(),
            time: "6:00 pm".to_string(),
            mode: "online".to_string(),
            audience: "Platform engineers".to_string(),
            agenda: strings(&["18:00 Intro", "18:30 Hacking", "21:00 Demos"]),
            organizer: "CNCF Community".to_string(),
            tags: strings(&["kubernetes", "cloud"]),
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = Config::from_env().context("invalid configuration")?;
    config.app_name = format!("{}_seed", config.app_name);
    let db = init_db(&config).await?;

    let event_repo = MongoEventRepository::new(&db);
    event_repo.ensure_indexes().await?;
    MongoBookingRepository::new(&db).ensure_indexes().await?;

    let events = EventStore::new(event_repo);
    for payload in sample_events() {
        match events.create(&payload).await {
            Ok(event) => info!("Seeded event {}", event.slug),
            Err(DataError::DuplicateSlug(slug)) => info!("Event {} already exists, skipping", slug),
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete");
    Ok(())
}
