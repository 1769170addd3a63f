pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod source;
pub mod state;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::DashboardConfig;
pub use source::{CsvFileSource, DataSource};
pub use state::AppState;
