use tauri::{command, AppHandle, Emitter, Runtime, State};
use tauri_plugin_autostart::ManagerExt;
use tauri_plugin_opener::OpenerExt;

use crate::app::window::{sync_config, MAIN_WINDOW_LABEL};
use crate::app::Shell;
use crate::config::ShellConfig;
use crate::error::{ResultExt, ShellError, ShellResult};
use crate::lifecycle::LinkDecision;

/// Event carrying the autostart state to the content.
pub const AUTOSTART_EVENT: &str = "autostart-state";

/// Enable or disable launching at login.
pub fn apply_autostart<R: Runtime>(app: &AppHandle<R>, enabled: bool) -> ShellResult<()> {
    let autostart = app.autolaunch();
    let result = if enabled {
        autostart.enable()
    } else {
        autostart.disable()
    };
    result.map_err(|e| ShellError::AutostartError(e.to_string()))?;
    log::info!("[SETTINGS] Autostart {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

/// Set autostart enabled/disabled
#[command]
pub async fn set_autostart(app: AppHandle, enabled: bool) -> ShellResult<()> {
    apply_autostart(&app, enabled)
}

/// Check if autostart is enabled and push the answer as an event too
#[command]
pub async fn query_autostart(app: AppHandle) -> ShellResult<bool> {
    let enabled = app
        .autolaunch()
        .is_enabled()
        .map_err(|e| ShellError::AutostartError(e.to_string()))?;

    if let Err(e) = app.emit_to(MAIN_WINDOW_LABEL, AUTOSTART_EVENT, enabled) {
        log::warn!("[SETTINGS] Failed to emit autostart state: {}", e);
    }
    Ok(enabled)
}

#[command]
pub fn get_config(shell: State<'_, Shell>) -> ShellConfig {
    shell.config.get()
}

/// Replace the config, restarting presence when its flag changed.
#[command]
pub async fn set_config(app: AppHandle, shell: State<'_, Shell>, config: ShellConfig) -> ShellResult<()> {
    let presence_was_enabled = shell.config.read(|current| current.discord_rpc);
    let presence_enabled = config.discord_rpc;

    shell.config.replace(config)?;

    if presence_was_enabled != presence_enabled {
        shell.presence.init(presence_enabled);
    }
    sync_config(&app);
    Ok(())
}

/// Flip the spellchecker flag; returns the new value.
#[command]
pub async fn toggle_spellcheck(app: AppHandle, shell: State<'_, Shell>) -> ShellResult<bool> {
    let enabled = shell.config.toggle_spellchecker()?;
    sync_config(&app);
    Ok(enabled)
}

/// Hand a link-open from the content to the OS handler when its scheme is
/// allowed. Returns whether it was dispatched.
#[command]
pub async fn open_external(app: AppHandle, shell: State<'_, Shell>, url: String) -> ShellResult<bool> {
    match shell.navigation.link_open(&url) {
        LinkDecision::OpenExternally(url) => {
            app.opener()
                .open_url(url.as_str(), None::<&str>)
                .with_context(|| format!("Failed to open {}", url))?;
            Ok(true)
        },
        LinkDecision::Deny => Ok(false),
    }
}
