use crate::config::Config;
use crate::storage::{FileStore, Progress};
use crate::timer::TimerBoard;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type FileProgress = Progress<FileStore>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub progress: Arc<Mutex<FileProgress>>,
    pub timers: Arc<Mutex<TimerBoard>>,
}

impl AppState {
    /// Reads both progress documents from the configured data directory.
    /// Blocking; call it from `spawn_blocking` inside the runtime.
    pub fn load(config: Config) -> Self {
        let progress = FileProgress::load(FileStore::new(&config.data_dir));
        Self {
            config: Arc::new(config),
            progress: Arc::new(Mutex::new(progress)),
            timers: Arc::new(Mutex::new(TimerBoard::new())),
        }
    }
}
