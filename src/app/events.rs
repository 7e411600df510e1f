//! Window and run-loop event handlers.

use tauri::{AppHandle, Manager, RunEvent, Runtime, Window, WindowEvent as TauriWindowEvent};

use super::deep_link;
use super::state::Shell;
use super::window::{dispatch, MAIN_WINDOW_LABEL};
use crate::lifecycle::{WindowEffect, WindowEvent};
use crate::picker::is_picker_window;

/// Handle window events for the application.
///
/// This is called from the Tauri builder's `on_window_event` hook.
pub fn handle_window_event<R: Runtime>(window: &Window<R>, event: &TauriWindowEvent) {
    match window.label() {
        MAIN_WINDOW_LABEL => handle_main_window_event(window, event),
        label if is_picker_window(label) => {
            if let TauriWindowEvent::Destroyed = event {
                window.app_handle().state::<Shell>().picker.window_closed(label);
            }
        },
        _ => {},
    }
}

fn handle_main_window_event<R: Runtime>(window: &Window<R>, event: &TauriWindowEvent) {
    let app = window.app_handle();

    match event {
        TauriWindowEvent::CloseRequested { api, .. } => {
            let minimise_to_tray = app.state::<Shell>().config.read(|config| config.minimise_to_tray);
            let effects = dispatch(app, WindowEvent::CloseRequested { minimise_to_tray });
            if effects.contains(&WindowEffect::PreventClose) {
                api.prevent_close();
            }
        },

        TauriWindowEvent::Resized(_) => {
            // Fix Windows resize lag by adding small delay
            // See: https://github.com/tauri-apps/tauri/issues/6322#issuecomment-2495685888
            #[cfg(target_os = "windows")]
            std::thread::sleep(std::time::Duration::from_millis(1));

            match window.is_maximized() {
                Ok(maximized) => {
                    dispatch(app, WindowEvent::Resized { maximized });
                },
                Err(e) => log::debug!("[WINDOW] Could not read maximised state: {}", e),
            }
        },

        TauriWindowEvent::Destroyed => {
            deep_link::window_gone(app);
            dispatch(app, WindowEvent::Destroyed);
        },

        _ => {},
    }
}

/// Handle run-loop events.
pub fn handle_run_event<R: Runtime>(app: &AppHandle<R>, event: RunEvent) {
    match event {
        RunEvent::ExitRequested { code, api, .. } => {
            let shell = app.state::<Shell>();
            // `code` is `None` when the runtime exits because the last window
            // closed; that is held back where the app outlives its window.
            let hold = {
                let lifecycle = shell.lifecycle.lock();
                code.is_none() && !lifecycle.state().exists && lifecycle.keeps_running_without_window()
            };
            if hold {
                log::debug!("[APP] Staying alive without a main window");
                api.prevent_exit();
                return;
            }
            dispatch(app, WindowEvent::AppExitRequested);
        },

        RunEvent::Exit => {
            app.state::<Shell>().presence.destroy();
            log::info!("[APP] Exit");
        },

        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            dispatch(app, WindowEvent::Activate);
        },

        _ => {},
    }
}
