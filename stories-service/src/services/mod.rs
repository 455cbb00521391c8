pub mod database;
pub mod gate;
pub mod metrics;
pub mod store;

pub use database::MongoDb;
pub use gate::{bootstrap, DatabaseGate};
pub use metrics::{get_metrics, init_metrics};
pub use store::StoryStore;
