//! Main window adapter.
//!
//! Feeds events into [`WindowLifecycle`](crate::lifecycle::WindowLifecycle)
//! and executes the returned effects on the live window.

use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Emitter, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use super::state::Shell;
use super::{deep_link, tray};
use crate::error::ShellResult;
use crate::lifecycle::{WindowEffect, WindowEvent};

/// Label of the single main window.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Event carrying the current config to the content.
pub const CONFIG_EVENT: &str = "config";

/// Routes link opens (`window.open`, `target="_blank"`) to the shell instead
/// of new webviews.
const LINK_OPEN_SCRIPT: &str = r#"
(() => {
  const openExternal = (url) => {
    try {
      const resolved = new URL(url, window.location.href).href;
      window.__TAURI_INTERNALS__.invoke('open_external', { url: resolved });
    } catch (_) {}
    return null;
  };
  window.open = (url) => openExternal(String(url));
  document.addEventListener('click', (event) => {
    const anchor = event.target instanceof Element ? event.target.closest('a[target="_blank"]') : null;
    if (anchor && anchor.href) {
      event.preventDefault();
      openExternal(anchor.href);
    }
  }, true);
})();
"#;

/// Feed `event` to the lifecycle and apply the resulting effects.
///
/// Returns the effects so callers holding a close request can honour
/// [`WindowEffect::PreventClose`].
pub fn dispatch<R: Runtime>(app: &AppHandle<R>, event: WindowEvent) -> Vec<WindowEffect> {
    let shell = app.state::<Shell>();
    let effects = shell.lifecycle.lock().handle(event);
    log::debug!("[WINDOW] {:?} -> {:?}", event, effects);

    for effect in &effects {
        if let Err(e) = apply(app, &shell, *effect) {
            log::error!("[WINDOW] Failed to apply {:?}: {}", effect, e);
        }
    }
    effects
}

fn apply<R: Runtime>(app: &AppHandle<R>, shell: &Shell, effect: WindowEffect) -> ShellResult<()> {
    let window = || app.get_webview_window(MAIN_WINDOW_LABEL);

    match effect {
        WindowEffect::CreateWindow { maximized } => {
            create_main_window(app, shell, maximized)?;
        },
        // Handled by the caller that owns the close request.
        WindowEffect::PreventClose => {},
        WindowEffect::Close => {
            if let Some(window) = window() {
                window.close()?;
            }
        },
        WindowEffect::Show => {
            if let Some(window) = window() {
                window.show()?;
            }
        },
        WindowEffect::Hide => {
            if let Some(window) = window() {
                window.hide()?;
            }
        },
        WindowEffect::Focus => {
            if let Some(window) = window() {
                window.set_focus()?;
            }
        },
        WindowEffect::Unminimize => {
            if let Some(window) = window() {
                window.unminimize()?;
            }
        },
        WindowEffect::Minimize => {
            if let Some(window) = window() {
                window.minimize()?;
            }
        },
        WindowEffect::Maximize => {
            if let Some(window) = window() {
                window.maximize()?;
            }
        },
        WindowEffect::Unmaximize => {
            if let Some(window) = window() {
                window.unmaximize()?;
            }
        },
        WindowEffect::ResyncTray => tray::update_tray_menu(app),
        WindowEffect::PersistMaximized(maximized) => {
            shell.config.set_window_maximised(maximized)?;
        },
        WindowEffect::ExitProcess => {
            log::info!("[WINDOW] Exiting");
            app.exit(0);
        },
    }
    Ok(())
}

fn create_main_window<R: Runtime>(
    app: &AppHandle<R>,
    shell: &Shell,
    maximized: bool,
) -> ShellResult<WebviewWindow<R>> {
    let config = shell.config.get();
    let guard = shell.navigation.clone();

    log::info!("[WINDOW] Creating main window for {}", shell.server_url);

    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(shell.server_url.clone()))
        .title("Mutiny")
        .inner_size(1280.0, 720.0)
        .min_inner_size(300.0, 300.0)
        .decorations(!config.custom_frame)
        .maximized(maximized)
        .center()
        .initialization_script(LINK_OPEN_SCRIPT)
        .on_navigation(move |url| guard.allows_navigation(url))
        .on_page_load(|window, payload| {
            let app = window.app_handle();
            if matches!(payload.event(), PageLoadEvent::Started) {
                deep_link::page_loading(app);
            } else if matches!(payload.event(), PageLoadEvent::Finished) {
                sync_config(app);
                deep_link::page_loaded(app);
            }
        })
        .build()?;

    Ok(window)
}

/// Push the current config to the content.
pub fn sync_config<R: Runtime>(app: &AppHandle<R>) {
    let config = app.state::<Shell>().config.get();
    if let Err(e) = app.emit_to(MAIN_WINDOW_LABEL, CONFIG_EVENT, config) {
        log::warn!("[WINDOW] Failed to sync config: {}", e);
    }
}
