//! Tray context menu model.
//!
//! The menu is rebuilt from scratch every time it is shown or the window
//! visibility changes; nothing is patched incrementally.

/// Menu id of the show/hide toggle.
pub const TOGGLE_ID: &str = "toggle";

/// Menu id of the quit item.
pub const QUIT_ID: &str = "quit";

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    /// Show the window if hidden, hide it if shown.
    ToggleWindow,
    /// Quit through the window lifecycle's quit path.
    Quit,
}

impl TrayAction {
    /// Map a clicked menu id back to its action.
    pub fn from_menu_id(id: &str) -> Option<Self> {
        match id {
            TOGGLE_ID => Some(TrayAction::ToggleWindow),
            QUIT_ID => Some(TrayAction::Quit),
            _ => None,
        }
    }
}

/// A single entry of the tray menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayMenuEntry {
    /// Disabled label.
    Header(String),
    /// Submenu of disabled labels.
    Submenu { label: String, items: Vec<String> },
    Separator,
    /// Clickable item.
    Item {
        id: &'static str,
        label: String,
        action: TrayAction,
    },
}

/// Static app metadata shown in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMeta {
    pub name: String,
    pub version: String,
}

impl Default for AppMeta {
    fn default() -> Self {
        Self {
            name: "Mutiny for Desktop".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Full menu derived from window visibility and app metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenuModel {
    pub entries: Vec<TrayMenuEntry>,
}

impl TrayMenuModel {
    pub fn build(meta: &AppMeta, window_visible: bool) -> Self {
        let toggle_label = if window_visible { "Hide App" } else { "Show App" };

        Self {
            entries: vec![
                TrayMenuEntry::Header(meta.name.clone()),
                TrayMenuEntry::Submenu {
                    label: "Version".into(),
                    items: vec![meta.version.clone()],
                },
                TrayMenuEntry::Separator,
                TrayMenuEntry::Item {
                    id: TOGGLE_ID,
                    label: toggle_label.into(),
                    action: TrayAction::ToggleWindow,
                },
                TrayMenuEntry::Item {
                    id: QUIT_ID,
                    label: "Quit App".into(),
                    action: TrayAction::Quit,
                },
            ],
        }
    }

    /// Label of the visibility toggle.
    pub fn toggle_label(&self) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            TrayMenuEntry::Item {
                action: TrayAction::ToggleWindow,
                label,
                ..
            } => Some(label.as_str()),
            _ => None,
        })
    }
}
