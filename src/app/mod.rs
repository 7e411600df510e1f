//! Tauri adapters: managed state, the main window, the tray, and event hooks.
//!
//! The decisions live in `lifecycle`; this module only executes them.

pub mod deep_link;
pub mod events;
pub mod state;
pub mod tray;
pub mod window;

pub use state::Shell;
