pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod tally;
pub mod ui;
pub mod users;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::JsonStore;
