pub mod app;
pub mod calendar;
pub mod config;
pub mod editing;
pub mod errors;
pub mod handlers;
pub mod input;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::EntryStore;
pub use tracker::Tracker;
