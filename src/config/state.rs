// Application state module
// Immutable per-process state shared by every connection

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::Config;
use crate::storage::FileStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: FileStore,
    /// Connections currently being served
    pub active_connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = FileStore::new(&config.storage.files_root, &config.storage.public_root);
        Self {
            config,
            store,
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Maximum accepted upload size in bytes
    pub const fn transfer_limit(&self) -> u64 {
        self.config.storage.limit_file_size
    }
}
