//! Shared types for the source picker.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Id prefix of whole-screen sources.
pub const SCREEN_PREFIX: &str = "screen:";
/// Id prefix of single-window sources.
pub const WINDOW_PREFIX: &str = "window:";

/// Which namespace a source id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Screen,
    Window,
}

impl SourceKind {
    pub fn of(id: &str) -> Option<Self> {
        if id.starts_with(SCREEN_PREFIX) {
            Some(SourceKind::Screen)
        } else if id.starts_with(WINDOW_PREFIX) {
            Some(SourceKind::Window)
        } else {
            None
        }
    }
}

/// A capturable screen or window, snapshotted at probe time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSource {
    /// Opaque id, `screen:<n>` or `window:<n>`.
    pub id: String,
    pub name: String,
    /// PNG data URL.
    pub thumbnail: String,
    /// PNG data URL of the owning application's icon, when known.
    pub app_icon: Option<String>,
}

impl CaptureSource {
    pub fn kind(&self) -> Option<SourceKind> {
        SourceKind::of(&self.id)
    }

    pub fn picked(&self) -> PickedSource {
        PickedSource {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The source handed back to the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PickedSource {
    pub id: String,
    pub name: String,
}
