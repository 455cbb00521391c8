#![allow(dead_code)]

use async_trait::async_trait;
use mongodb::bson::Document;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use stories_service::config::{MongoConfig, StoriesConfig};
use stories_service::models::Story;
use stories_service::services::{DatabaseGate, MongoDb, StoryStore};
use stories_service::startup::Application;
use uuid::Uuid;

/// Nothing listens on port 1, so every operation times out quickly.
pub const UNREACHABLE_URI: &str = "mongodb://127.0.0.1:1";

/// In-memory stand-in for the stories collection.
pub struct InMemoryStories {
    docs: Vec<Document>,
    healthy: bool,
}

impl InMemoryStories {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs,
            healthy: true,
        }
    }

    pub fn failing() -> Self {
        Self {
            docs: Vec::new(),
            healthy: false,
        }
    }
}

#[async_trait]
impl StoryStore for InMemoryStories {
    async fn list_stories(&self) -> Result<Vec<Story>, AppError> {
        if !self.healthy {
            return Err(AppError::database(
                "Database error",
                anyhow::anyhow!("simulated outage"),
            ));
        }
        Ok(self.docs.iter().cloned().map(Story::from).collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::database(
                "MongoDB ping failed",
                anyhow::anyhow!("simulated outage"),
            ))
        }
    }
}

pub fn test_config(uri: &str, database: &str) -> StoriesConfig {
    StoriesConfig {
        common: CoreConfig {
            port: 0,
            log_level: "info".to_string(),
        },
        mongodb: MongoConfig {
            uri: uri.to_string(),
            database: database.to_string(),
            server_selection_timeout: Duration::from_millis(250),
            fail_fast: false,
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub gate: DatabaseGate,
}

impl TestApp {
    /// Spawn the app on a random port around `gate`.
    pub async fn spawn_with_gate(gate: DatabaseGate) -> Self {
        let config = test_config(UNREACHABLE_URI, "stories_test");
        let app = Application::with_gate(config, gate)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    pub async fn spawn_with_store(store: impl StoryStore + 'static) -> Self {
        Self::spawn_with_gate(DatabaseGate::open_with(Arc::new(store))).await
    }

    /// Spawn through the real bootstrap path.
    pub async fn spawn(config: StoriesConfig) -> Result<Self, AppError> {
        let app = Application::build(config).await?;
        Ok(Self::run(app).await)
    }

    async fn run(app: Application) -> Self {
        let port = app.port();
        let gate = app.gate().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the listener by polling the greeting endpoint
        let client = reqwest::Client::new();
        let probe = format!("{}/api", address);
        for _ in 0..50 {
            if client.get(&probe).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            gate,
        }
    }
}

/// A live MongoDB with a fresh database, for the `#[ignore]`d tests.
pub struct MongoFixture {
    pub config: StoriesConfig,
    pub db: MongoDb,
}

impl MongoFixture {
    pub async fn new() -> Self {
        let uri = std::env::var("MONGO_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database = format!("stories_test_{}", Uuid::new_v4().simple());
        let mut config = test_config(&uri, &database);
        config.mongodb.server_selection_timeout = Duration::from_secs(5);

        let db = MongoDb::connect(&config.mongodb)
            .await
            .expect("Failed to create MongoDB client");

        Self { config, db }
    }

    pub async fn cleanup(&self) {
        let _ = self.db.database().drop(None).await;
    }
}
