//! Lazily established, process-wide database connection.
//!
//! [`ConnectionManager`] moves through three states: unconnected, connecting
//! (one attempt shared by every caller that arrives meanwhile) and connected
//! (a cached handle). A failed attempt is reported to all of its waiters and
//! resets the manager so the next caller starts a fresh attempt.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{info, warn};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use once_cell::sync::OnceCell;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{DataError, DataResult};

#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> anyhow::Result<Self::Handle>;
}

type PendingConnect<H> = Shared<BoxFuture<'static, Result<H, Arc<anyhow::Error>>>>;

enum ConnectionState<H> {
    Unconnected,
    Connecting(PendingConnect<H>),
    Connected(H),
}

pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    state: Mutex<ConnectionState<C::Handle>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            state: Mutex::new(ConnectionState::Unconnected),
        }
    }

    /// Returns the cached handle, joining or starting a connection attempt if needed.
    pub async fn acquire(&self) -> DataResult<C::Handle> {
        let pending = {
            let mut state = self.state.lock().await;
            match &*state {
                ConnectionState::Connected(handle) => return Ok(handle.clone()),
                ConnectionState::Connecting(pending) => pending.clone(),
                ConnectionState::Unconnected => {
                    let connector = Arc::clone(&self.connector);
                    let pending = async move { connector.connect().await.map_err(Arc::new) }
                        .boxed()
                        .shared();
                    *state = ConnectionState::Connecting(pending.clone());
                    pending
                }
            }
        };

        let outcome = pending.clone().await;

        let mut state = self.state.lock().await;
        let still_current =
            matches!(&*state, ConnectionState::Connecting(current) if current.ptr_eq(&pending));
        match outcome {
            Ok(handle) => {
                if still_current {
                    *state = ConnectionState::Connected(handle.clone());
                }
                Ok(handle)
            }
            Err(err) => {
                if still_current {
                    warn!("database connection attempt failed: {:#}", err);
                    *state = ConnectionState::Unconnected;
                }
                Err(DataError::ConnectionFailure(format!("{:#}", err)))
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn is_connected(&self) -> bool {
        matches!(&*self.state.lock().await, ConnectionState::Connected(_))
    }
}

pub struct MongoConnector {
    uri: String,
    database_name: String,
    app_name: String,
}

impl MongoConnector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            uri: config.mongodb_uri.clone(),
            database_name: config.database_name.clone(),
            app_name: config.app_name.clone(),
        }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = Database;

    async fn connect(&self) -> anyhow::Result<Database> {
        let mut client_options = ClientOptions::parse(&self.uri).await?;
        client_options.app_name = Some(self.app_name.clone());

        let client = Client::with_options(client_options)?;
        let db = client.database(&self.database_name);
        // Client construction is lazy; a ping forces the first round trip.
        db.run_command(doc! { "ping": 1 }, None).await?;
        info!("Connected to MongoDB database {}", self.database_name);
        Ok(db)
    }
}

static CONNECTION: OnceCell<ConnectionManager<MongoConnector>> = OnceCell::new();

/// Process-wide manager, built from `config` on first use. Later calls ignore
/// their `config` argument and return the existing instance.
pub fn init_global(config: &Config) -> &'static ConnectionManager<MongoConnector> {
    CONNECTION.get_or_init(|| ConnectionManager::new(MongoConnector::from_config(config)))
}

pub async fn init_db(config: &Config) -> DataResult<Database> {
    init_global(config).acquire().await
}
