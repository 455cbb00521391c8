use crate::models::Story;
use async_trait::async_trait;
use service_core::error::AppError;

/// Read side of the stories collection.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Every story, in the backend's natural order.
    async fn list_stories(&self) -> Result<Vec<Story>, AppError>;

    /// Cheap round-trip proving the backend is reachable.
    async fn health_check(&self) -> Result<(), AppError>;
}
