pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use error::{Result, TrackerError};
pub use services::tracker_service::TrackerService;
