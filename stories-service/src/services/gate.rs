//! Readiness gate around the database handle.
//!
//! The gate is written at most once, by [`bootstrap`]. Until then every
//! caller gets `ServiceUnavailable` instead of a half-initialised handle.

use crate::config::MongoConfig;
use crate::services::{MongoDb, StoryStore};
use service_core::error::AppError;
use std::sync::{Arc, OnceLock};

pub const NOT_READY: &str = "database not ready";

#[derive(Clone, Default)]
pub struct DatabaseGate {
    store: Arc<OnceLock<Arc<dyn StoryStore>>>,
}

impl DatabaseGate {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn open_with(store: Arc<dyn StoryStore>) -> Self {
        let gate = Self::closed();
        gate.open(store);
        gate
    }

    /// Returns false if the gate was already open; the first store wins.
    pub fn open(&self, store: Arc<dyn StoryStore>) -> bool {
        self.store.set(store).is_ok()
    }

    pub fn is_open(&self) -> bool {
        self.store.get().is_some()
    }

    pub fn store(&self) -> Result<Arc<dyn StoryStore>, AppError> {
        self.store
            .get()
            .cloned()
            .ok_or_else(|| AppError::ServiceUnavailable(NOT_READY.to_string()))
    }
}

/// Connect, verify with a ping, then hand the handle to `gate`.
///
/// On error the gate is left untouched.
pub async fn bootstrap(config: &MongoConfig, gate: &DatabaseGate) -> Result<(), AppError> {
    tracing::info!(database = %config.database, "Bootstrapping MongoDB connection");

    let db = MongoDb::connect(config).await?;
    db.health_check().await?;

    if !gate.open(Arc::new(db)) {
        tracing::warn!("Database gate was already open; keeping the existing handle");
    }
    tracing::info!(database = %config.database, "MongoDB ready");

    Ok(())
}
