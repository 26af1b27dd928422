pub mod config;
pub mod error;
pub mod history;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use error::AppError;
pub use history::HistoryStore;
pub use routes::{AppState, router};
