use crate::config::MongoConfig;
use crate::models::{Story, STORIES_COLLECTION};
use crate::services::StoryStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

const APP_NAME: &str = "stories-service";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Build a client for `config.uri`. The driver connects lazily, so this
    /// only fails on a malformed URI; use `health_check` to prove reachability.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::database("Invalid MongoDB connection string", e)
        })?;
        client_options.app_name = Some(APP_NAME.to_string());
        client_options.server_selection_timeout = Some(config.server_selection_timeout);

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::database("Failed to create MongoDB client", e)
        })?;
        let db = client.database(&config.database);
        tracing::info!(database = %config.database, "MongoDB client created");

        Ok(Self { client, db })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::warn!("MongoDB ping failed: {}", e);
                AppError::database("MongoDB ping failed", e)
            })?;
        Ok(())
    }

    pub fn stories(&self) -> Collection<Document> {
        self.db.collection(STORIES_COLLECTION)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl StoryStore for MongoDb {
    #[tracing::instrument(skip(self))]
    async fn list_stories(&self) -> Result<Vec<Story>, AppError> {
        let cursor = self.stories().find(None, None).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        tracing::debug!(count = docs.len(), "Fetched stories");
        Ok(docs.into_iter().map(Story::from).collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        MongoDb::health_check(self).await
    }
}
