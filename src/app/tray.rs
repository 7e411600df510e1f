//! System tray setup and event handling.
//!
//! The tray lives for the whole process. Its menu is rebuilt from
//! [`TrayMenuModel`] on every resync rather than patched item by item.

use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem, Submenu},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager, Runtime,
};

use super::state::Shell;
use super::window::dispatch;
use crate::error::ShellResult;
use crate::lifecycle::{TrayAction, TrayMenuEntry, TrayMenuModel, WindowEvent};

pub const TRAY_ID: &str = "main";

const TOOLTIP: &str = "Mutiny for Desktop";

/// Build the menu for `model`.
fn build_menu<R: Runtime, M: Manager<R>>(manager: &M, model: &TrayMenuModel) -> tauri::Result<Menu<R>> {
    let menu = Menu::new(manager)?;

    for entry in &model.entries {
        match entry {
            TrayMenuEntry::Header(label) => {
                menu.append(&MenuItem::new(manager, label, false, None::<&str>)?)?;
            },
            TrayMenuEntry::Submenu { label, items } => {
                let submenu = Submenu::new(manager, label, true)?;
                for item in items {
                    submenu.append(&MenuItem::new(manager, item, false, None::<&str>)?)?;
                }
                menu.append(&submenu)?;
            },
            TrayMenuEntry::Separator => {
                menu.append(&PredefinedMenuItem::separator(manager)?)?;
            },
            TrayMenuEntry::Item { id, label, .. } => {
                menu.append(&MenuItem::with_id(manager, *id, label, true, None::<&str>)?)?;
            },
        }
    }

    Ok(menu)
}

fn current_model<R: Runtime>(app: &AppHandle<R>) -> TrayMenuModel {
    let shell = app.state::<Shell>();
    let visible = shell.lifecycle.lock().state().visible;
    TrayMenuModel::build(&shell.meta, visible)
}

/// Create the tray icon. Called once from setup.
pub fn init_tray<R: Runtime>(app: &AppHandle<R>) -> ShellResult<()> {
    let menu = build_menu(app, &current_model(app))?;

    // 32x32 is standard for the system tray
    let icon = Image::from_bytes(include_bytes!("../../icons/32x32.png"))?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .tooltip(TOOLTIP)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match TrayAction::from_menu_id(event.id.as_ref()) {
            Some(TrayAction::ToggleWindow) => {
                dispatch(app, WindowEvent::ToggleVisibility);
            },
            Some(TrayAction::Quit) => {
                dispatch(app, WindowEvent::QuitRequested);
            },
            None => {},
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                dispatch(tray.app_handle(), WindowEvent::Activate);
            }
        })
        .build(app)?;

    log::debug!("[TRAY] Tray icon created");
    Ok(())
}

/// Rebuild the tray menu from the current window state.
pub fn update_tray_menu<R: Runtime>(app: &AppHandle<R>) {
    let Some(tray) = app.tray_by_id(TRAY_ID) else {
        // Not created yet; setup builds it from the same state.
        return;
    };

    let result = build_menu(app, &current_model(app)).and_then(|menu| tray.set_menu(Some(menu)));
    if let Err(e) = result {
        log::warn!("[TRAY] Failed to update tray menu: {}", e);
    }
}
