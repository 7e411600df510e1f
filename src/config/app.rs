//! Application-level configuration.
//!
//! Contains the user preferences the shell reads at startup or on demand:
//! - Window management (minimise to tray, custom frame, maximised state)
//! - Webview behaviour (hardware acceleration, spellcheck)
//! - Integrations (rich presence)
//!
//! Uses `parking_lot::RwLock` for thread-safe access. The store is owned by
//! the managed `Shell` state; nothing reaches it through a global.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ShellResult;

/// Persisted window state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct WindowStateConfig {
    /// Whether the main window was maximised when last observed.
    pub is_maximised: bool,
}

/// User preferences consumed by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ShellConfig {
    /// Let the webview use GPU compositing.
    pub hardware_acceleration: bool,
    /// True until the first-launch setup (autostart) has run.
    pub first_launch: bool,
    /// Hide to the tray instead of quitting when the window is closed.
    pub minimise_to_tray: bool,
    /// Draw the window frame inside the hosted content (undecorated window).
    pub custom_frame: bool,
    pub window_state: WindowStateConfig,
    /// Publish rich presence to a running Discord client.
    pub discord_rpc: bool,
    pub spellchecker: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            hardware_acceleration: true,
            first_launch: true,
            minimise_to_tray: true,
            custom_frame: false,
            window_state: WindowStateConfig::default(),
            discord_rpc: true,
            spellchecker: true,
        }
    }
}

/// Where the config is persisted.
pub trait ConfigBackend: Send + Sync {
    /// Stored config, or `None` when nothing was saved yet.
    fn load(&self) -> ShellResult<Option<ShellConfig>>;

    fn save(&self, config: &ShellConfig) -> ShellResult<()>;
}

/// Typed config cache in front of a [`ConfigBackend`].
///
/// A store without a backend keeps everything in memory (used by tests and as
/// the fallback when the persistent store cannot be opened).
pub struct ConfigStore {
    backend: Option<Box<dyn ConfigBackend>>,
    config: RwLock<ShellConfig>,
}

impl ConfigStore {
    /// Load from `backend`, falling back to defaults when nothing is stored
    /// or the stored values are unreadable.
    pub fn load(backend: Box<dyn ConfigBackend>) -> Self {
        let config = match backend.load() {
            Ok(Some(config)) => config,
            Ok(None) => ShellConfig::default(),
            Err(e) => {
                log::warn!("[CONFIG] Ignoring unreadable config: {}", e);
                ShellConfig::default()
            },
        };

        Self {
            backend: Some(backend),
            config: RwLock::new(config),
        }
    }

    pub fn in_memory(config: ShellConfig) -> Self {
        Self {
            backend: None,
            config: RwLock::new(config),
        }
    }

    /// Snapshot of the current values.
    pub fn get(&self) -> ShellConfig {
        self.config.read().clone()
    }

    /// Read a single value without cloning the whole config.
    pub fn read<R>(&self, f: impl FnOnce(&ShellConfig) -> R) -> R {
        f(&self.config.read())
    }

    /// Mutate the config and persist the result.
    pub fn update<R>(&self, f: impl FnOnce(&mut ShellConfig) -> R) -> ShellResult<R> {
        let (result, snapshot) = {
            let mut config = self.config.write();
            let result = f(&mut config);
            (result, config.clone())
        };
        self.persist(&snapshot)?;
        Ok(result)
    }

    /// Replace the whole config at once (for frontend sync).
    pub fn replace(&self, config: ShellConfig) -> ShellResult<()> {
        self.update(|current| *current = config)
    }

    /// Record the main window's maximised state. Returns true if it changed.
    pub fn set_window_maximised(&self, maximised: bool) -> ShellResult<bool> {
        self.update(|config| {
            let changed = config.window_state.is_maximised != maximised;
            config.window_state.is_maximised = maximised;
            changed
        })
    }

    /// Flip the spellcheck preference, returning the new value.
    pub fn toggle_spellchecker(&self) -> ShellResult<bool> {
        self.update(|config| {
            config.spellchecker = !config.spellchecker;
            config.spellchecker
        })
    }

    fn persist(&self, config: &ShellConfig) -> ShellResult<()> {
        match &self.backend {
            Some(backend) => backend.save(config),
            None => Ok(()),
        }
    }
}
