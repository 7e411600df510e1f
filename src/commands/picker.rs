use tauri::{command, AppHandle, State};

use crate::app::Shell;
use crate::error::ShellResult;
use crate::picker::window::{destroy_stale_modals, open_modal};
use crate::picker::PickedSource;

/// Ask the user for a screen or window to share.
///
/// Resolves to `None` when nothing is available, the picker cannot be shown,
/// or the user backs out.
#[command]
pub async fn show_screen_picker(app: AppHandle, shell: State<'_, Shell>) -> ShellResult<Option<PickedSource>> {
    shell
        .picker
        .request(|| destroy_stale_modals(&app), |label, _| open_modal(&app, label))
        .await
}
