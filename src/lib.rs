pub mod api;
pub mod config;
pub mod storage;

pub use api::{router, AppState};
pub use config::AppConfig;
