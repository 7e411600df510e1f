//! Window, tray and navigation state machines.
//!
//! Everything here is pure: inputs are events, outputs are effects or
//! decisions. The Tauri adapters in `app` execute them.

pub mod deep_link;
pub mod navigation;
pub mod tray_menu;
pub mod window;

pub use deep_link::{DeepLinkQueue, DeepLinkSource};
pub use navigation::{LinkDecision, NavigationGuard};
pub use tray_menu::{AppMeta, TrayAction, TrayMenuEntry, TrayMenuModel};
pub use window::{WindowEffect, WindowEvent, WindowLifecycle, WindowState};
