use crate::storage::JsonStore;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(store: JsonStore, static_dir: PathBuf) -> Self {
        Self {
            store: Arc::new(store),
            static_dir,
        }
    }
}
