//! Application configuration management.
//!
//! - `ShellConfig`: user preferences (tray, frame, presence, spellcheck, ...)
//! - `ConfigStore`: typed config behind a `parking_lot::RwLock`
//! - `store`: persistence through `tauri-plugin-store`
//! - `server`: the hosted content origin and its command-line override

pub mod app;
pub mod server;
pub mod store;

pub use app::{ConfigBackend, ConfigStore, ShellConfig, WindowStateConfig};
pub use server::{default_server_url, server_url_from_args};
