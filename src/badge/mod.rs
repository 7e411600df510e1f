//! Unread-count badge rendering.
//!
//! [`BadgeRenderer`] turns a count into a [`BadgeCommand`] for the mechanism
//! the platform offers; [`sink`] applies that command to the OS. The
//! mechanism is chosen once at startup.
//!
//! Count semantics: `0` clears, `-1` means "unread present, count unknown",
//! anything above 9 is shown as "9+".

pub mod icon;
pub mod sink;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ShellError, ShellResult};
use icon::BadgeIcon;

/// Count value meaning "there are unread messages, number unknown".
pub const UNKNOWN_COUNT: i64 = -1;

/// Largest bucket; every count at or above this shares one icon.
pub const MAX_BUCKET: i64 = 10;

/// Dock label for [`UNKNOWN_COUNT`].
pub const DOCK_SENTINEL: &str = "•";

const FLATPAK_APP_URI: &str = "application://gg.mutinyapp.mutiny-desktop.desktop";
const DESKTOP_APP_URI: &str = "application://mutiny-desktop.desktop";

/// Badge mechanism available on this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeCapability {
    /// Taskbar overlay icon (Windows).
    OverlayIcon,
    /// Dock tile label (macOS).
    DockLabel,
    /// Launcher-entry signal on the session bus (Linux desktops).
    DesktopSignal,
}

impl BadgeCapability {
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "windows") {
            BadgeCapability::OverlayIcon
        } else if cfg!(target_os = "macos") {
            BadgeCapability::DockLabel
        } else {
            BadgeCapability::DesktopSignal
        }
    }
}

/// Payload of a `com.canonical.Unity.LauncherEntry.Update` signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSignal {
    pub app_uri: &'static str,
    pub count: i64,
    pub count_visible: bool,
}

/// What the sink should do with the OS badge.
#[derive(Debug, Clone, PartialEq)]
pub enum BadgeCommand {
    Overlay {
        icon: Arc<BadgeIcon>,
        description: String,
    },
    ClearOverlay {
        description: &'static str,
    },
    DockLabel(String),
    ClearDockLabel,
    Signal(LauncherSignal),
}

pub struct BadgeRenderer {
    capability: BadgeCapability,
    /// Overlay icons by bucket, rendered on first use.
    icons: HashMap<i64, Arc<BadgeIcon>>,
}

impl BadgeRenderer {
    pub fn new(capability: BadgeCapability) -> Self {
        Self {
            capability,
            icons: HashMap::new(),
        }
    }

    pub fn for_current_platform() -> Self {
        Self::new(BadgeCapability::for_current_platform())
    }

    /// Number of overlay icons rendered so far.
    pub fn cached_icons(&self) -> usize {
        self.icons.len()
    }

    pub fn render(&mut self, count: i64) -> ShellResult<BadgeCommand> {
        if count < UNKNOWN_COUNT {
            return Err(ShellError::InvalidBadgeCount { count });
        }

        let command = match self.capability {
            BadgeCapability::OverlayIcon => self.overlay(count),
            BadgeCapability::DockLabel => dock_label(count),
            BadgeCapability::DesktopSignal => BadgeCommand::Signal(launcher_signal(count, is_sandboxed())),
        };
        Ok(command)
    }

    fn overlay(&mut self, count: i64) -> BadgeCommand {
        if count == 0 {
            return BadgeCommand::ClearOverlay {
                description: "No Notifications",
            };
        }

        let bucket = bucket_for(count);
        let icon = self
            .icons
            .entry(bucket)
            .or_insert_with(|| {
                log::debug!("[BADGE] Rendering overlay icon for bucket {}", bucket);
                Arc::new(BadgeIcon::render(bucket))
            })
            .clone();

        let description = if count == UNKNOWN_COUNT {
            "Unread Messages".to_string()
        } else {
            format!("{} Notifications", count)
        };

        BadgeCommand::Overlay { icon, description }
    }
}

/// Icon bucket for a non-zero count.
pub fn bucket_for(count: i64) -> i64 {
    if count == UNKNOWN_COUNT {
        UNKNOWN_COUNT
    } else {
        count.min(MAX_BUCKET)
    }
}

fn dock_label(count: i64) -> BadgeCommand {
    match count {
        0 => BadgeCommand::ClearDockLabel,
        UNKNOWN_COUNT => BadgeCommand::DockLabel(DOCK_SENTINEL.to_string()),
        n => BadgeCommand::DockLabel(n.to_string()),
    }
}

fn launcher_signal(count: i64, sandboxed: bool) -> LauncherSignal {
    LauncherSignal {
        app_uri: if sandboxed { FLATPAK_APP_URI } else { DESKTOP_APP_URI },
        // The launcher has no sentinel value; -1 is sent as 0 but stays visible.
        count: count.max(0),
        count_visible: count != 0,
    }
}

/// Whether we run inside a Flatpak sandbox.
pub fn is_sandboxed() -> bool {
    std::env::var_os("FLATPAK_ID").is_some()
        || std::env::var("container").is_ok_and(|value| value == "flatpak")
        || std::path::Path::new("/.flatpak-info").exists()
}
