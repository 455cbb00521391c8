pub mod story;

pub use story::{Story, STORIES_COLLECTION};
