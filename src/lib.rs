pub mod app;
pub mod config;
pub mod errors;
pub mod feedback;
pub mod handlers;
pub mod models;
pub mod plan;
pub mod state;
pub mod storage;
pub mod timer;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use timer::run_ticker;
