//! Window controls for custom-frame content.

use tauri::{command, AppHandle, Manager};

use crate::app::window::{dispatch, MAIN_WINDOW_LABEL};
use crate::error::{ShellError, ShellResult};
use crate::lifecycle::WindowEvent;

#[command]
pub fn window_minimize(app: AppHandle) {
    dispatch(&app, WindowEvent::Minimize);
}

#[command]
pub fn window_toggle_maximize(app: AppHandle) {
    dispatch(&app, WindowEvent::ToggleMaximize);
}

/// Close through the normal close request, so minimise-to-tray applies.
#[command]
pub fn window_close(app: AppHandle) -> ShellResult<()> {
    let window = app
        .get_webview_window(MAIN_WINDOW_LABEL)
        .ok_or(ShellError::MainWindowMissing)?;
    window.close()?;
    Ok(())
}
