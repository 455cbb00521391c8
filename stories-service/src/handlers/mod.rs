pub mod api;
pub mod health;
pub mod stories;

pub use api::{greeting, not_found};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use stories::list_stories;
