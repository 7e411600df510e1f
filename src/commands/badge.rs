use tauri::{command, AppHandle, State};

use crate::app::Shell;
use crate::error::ShellResult;

/// Show an unread count on the taskbar, dock or launcher.
///
/// `0` clears, `-1` shows an indicator without a number. Calls are applied
/// as they come; callers debounce.
#[command]
pub async fn set_badge_count(app: AppHandle, shell: State<'_, Shell>, count: i64) -> ShellResult<()> {
    let command = shell.badge.lock().render(count)?;
    shell.badge_sink.apply(&app, command).await;
    Ok(())
}
