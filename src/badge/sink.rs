//! Applies [`BadgeCommand`]s to the OS.
//!
//! An unavailable mechanism is logged and otherwise ignored; badge updates
//! never fail the caller.

use tauri::{AppHandle, Manager, Runtime};

use super::BadgeCommand;
use crate::app::window::MAIN_WINDOW_LABEL;

#[cfg(target_os = "linux")]
use super::LauncherSignal;

/// OS side of the badge renderer.
#[derive(Default)]
pub struct BadgeSink {
    /// Session bus, connected on first signal and reused afterwards.
    #[cfg(target_os = "linux")]
    bus: tokio::sync::OnceCell<zbus::Connection>,
}

impl BadgeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn apply<R: Runtime>(&self, app: &AppHandle<R>, command: BadgeCommand) {
        match command {
            BadgeCommand::Overlay { icon, description } => {
                log::debug!("[BADGE] Overlay: {}", description);
                #[cfg(target_os = "windows")]
                {
                    let image = tauri::image::Image::new_owned(icon.rgba.clone(), icon.width, icon.height);
                    set_overlay(app, Some(image));
                }
                #[cfg(not(target_os = "windows"))]
                let _ = (app, icon);
            },
            BadgeCommand::ClearOverlay { description } => {
                log::debug!("[BADGE] Overlay: {}", description);
                #[cfg(target_os = "windows")]
                set_overlay(app, None);
                #[cfg(not(target_os = "windows"))]
                let _ = app;
            },
            BadgeCommand::DockLabel(label) => set_dock_label(app, Some(label)),
            BadgeCommand::ClearDockLabel => set_dock_label(app, None),
            BadgeCommand::Signal(signal) => {
                #[cfg(target_os = "linux")]
                self.emit_launcher_signal(&signal).await;
                #[cfg(not(target_os = "linux"))]
                log::debug!("[BADGE] Launcher signals unsupported here, dropping {:?}", signal);
            },
        }
    }

    #[cfg(target_os = "linux")]
    async fn emit_launcher_signal(&self, signal: &LauncherSignal) {
        use std::collections::HashMap;
        use zbus::zvariant::Value;

        let connection = match self.bus.get_or_try_init(zbus::Connection::session).await {
            Ok(connection) => connection,
            Err(e) => {
                log::debug!("[BADGE] Session bus unavailable: {}", e);
                return;
            },
        };

        let mut properties: HashMap<&str, Value<'_>> = HashMap::new();
        properties.insert("count", Value::I64(signal.count));
        properties.insert("count-visible", Value::Bool(signal.count_visible));

        if let Err(e) = connection
            .emit_signal(
                None::<&str>,
                "/",
                "com.canonical.Unity.LauncherEntry",
                "Update",
                &(signal.app_uri, properties),
            )
            .await
        {
            log::debug!("[BADGE] Failed to emit launcher update: {}", e);
        }
    }
}

#[cfg(target_os = "windows")]
fn set_overlay<R: Runtime>(app: &AppHandle<R>, image: Option<tauri::image::Image<'static>>) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        log::debug!("[BADGE] No main window for overlay icon");
        return;
    };
    if let Err(e) = window.set_overlay_icon(image) {
        log::warn!("[BADGE] Failed to set overlay icon: {}", e);
    }
}

fn set_dock_label<R: Runtime>(app: &AppHandle<R>, label: Option<String>) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        log::debug!("[BADGE] No main window for dock label");
        return;
    };

    #[cfg(target_os = "macos")]
    if let Err(e) = window.set_badge_label(label) {
        log::warn!("[BADGE] Failed to set dock label: {}", e);
    }
    #[cfg(not(target_os = "macos"))]
    log::debug!("[BADGE] Dock labels unsupported here, dropping {:?} for {}", label, window.label());
}
