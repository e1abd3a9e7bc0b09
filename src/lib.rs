pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod progression;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;
pub mod trend;
pub mod vaccines;
pub mod workout;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
