//! Core state management for a markdown note-taking application.
//!
//! Notes live in a folder tree and carry tags; a pure filter engine
//! computes the visible list from the active folder, tag selection, and
//! search query; a debounced autosave controller commits editor buffers to
//! the store, which persists every mutation through a key-value storage
//! adapter.

mod autosave;
mod config;
mod errors;
mod filter;
mod note;
mod preview;
mod session;
mod storage;
mod store;
mod types;

// Re-export key components
pub use autosave::*;
pub use config::*;
pub use errors::*;
pub use filter::*;
pub use note::*;
pub use preview::*;
pub use session::*;
pub use storage::*;
pub use store::*;
pub use types::*;

use log::info;

/// Initializes the `env_logger`-backed logger. Embedding shells call this
/// once at startup; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(true)
        .try_init();
    info!("Logger initialized");
}
