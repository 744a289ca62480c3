use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};

use blogspot_core::error::RepoError;

/// MongoDB connection configuration.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub connect_timeout: Duration,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "blogspot".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl MongoConfig {
    /// Load configuration from environment variables.
    ///
    /// `MONGODB_URI` wins when set; otherwise the URI is assembled from
    /// `DB_HOST` and `DB_PORT`. The database name comes from `DB_DATABASE`.
    pub fn from_env() -> Self {
        let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| {
            let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = std::env::var("DB_PORT").unwrap_or_else(|_| "27017".to_string());
            format!("mongodb://{host}:{port}")
        });

        Self {
            uri,
            database: std::env::var("DB_DATABASE").unwrap_or_else(|_| "blogspot".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("DB_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

/// Handle to the MongoDB database, opened once at process start and shared
/// by every repository.
pub struct MongoConnections {
    pub db: Database,
}

impl MongoConnections {
    /// Connect and verify the server answers a ping before handing the
    /// database out.
    pub async fn init(config: &MongoConfig) -> Result<Self, RepoError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client =
            Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;
        let db = client.database(&config.database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        tracing::info!(database = %config.database, "Connected to MongoDB");

        Ok(Self { db })
    }

    /// Whether the server currently answers a ping.
    pub async fn is_alive(&self) -> bool {
        self.db.run_command(doc! { "ping": 1 }).await.is_ok()
    }

    /// Typed handle to a named collection.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> mongodb::Collection<T> {
        self.db.collection(name)
    }
}
