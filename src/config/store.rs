//! Persistence through `tauri-plugin-store`.
//!
//! Each top-level config field is its own key in `config.json` under the app
//! data directory. Missing keys fall back to their defaults on load.

use std::sync::Arc;

use serde_json::{Map, Value};
use tauri::{AppHandle, Runtime};
use tauri_plugin_store::{Store, StoreExt};

use super::app::{ConfigBackend, ConfigStore, ShellConfig};
use crate::error::{ResultExt, ShellError, ShellResult};

/// Store file name, relative to the app data directory.
pub const CONFIG_STORE_FILE: &str = "config.json";

/// [`ConfigBackend`] over a plugin store.
pub struct TauriStoreBackend<R: Runtime> {
    store: Arc<Store<R>>,
}

impl<R: Runtime> TauriStoreBackend<R> {
    pub fn new(store: Arc<Store<R>>) -> Self {
        Self { store }
    }
}

impl<R: Runtime> ConfigBackend for TauriStoreBackend<R> {
    fn load(&self) -> ShellResult<Option<ShellConfig>> {
        config_from_entries(self.store.entries())
    }

    fn save(&self, config: &ShellConfig) -> ShellResult<()> {
        for (key, value) in config_entries(config)? {
            self.store.set(key, value);
        }
        self.store.save().context("Failed to save config store")?;
        log::debug!("[CONFIG] Saved {}", CONFIG_STORE_FILE);
        Ok(())
    }
}

impl ConfigStore {
    /// Open the persistent store, or fall back to in-memory defaults.
    pub fn open<R: Runtime>(app: &AppHandle<R>) -> Self {
        match app.store(CONFIG_STORE_FILE) {
            Ok(store) => Self::load(Box::new(TauriStoreBackend::new(store))),
            Err(e) => {
                log::warn!("[CONFIG] Config store unavailable, using in-memory config: {}", e);
                Self::in_memory(ShellConfig::default())
            },
        }
    }
}

fn config_from_entries(entries: Vec<(String, Value)>) -> ShellResult<Option<ShellConfig>> {
    if entries.is_empty() {
        return Ok(None);
    }
    let object: Map<String, Value> = entries.into_iter().collect();
    Ok(Some(serde_json::from_value(Value::Object(object))?))
}

fn config_entries(config: &ShellConfig) -> ShellResult<Vec<(String, Value)>> {
    match serde_json::to_value(config)? {
        Value::Object(object) => Ok(object.into_iter().collect()),
        other => Err(ShellError::Other(format!("Config serialised to {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_store_has_no_config() {
        assert_eq!(config_from_entries(Vec::new()).unwrap(), None);
    }

    #[test]
    fn test_partial_store_fills_defaults() {
        let entries = vec![
            ("minimiseToTray".to_string(), json!(false)),
            ("windowState".to_string(), json!({ "isMaximised": true })),
        ];
        let config = config_from_entries(entries).unwrap().unwrap();
        assert!(!config.minimise_to_tray);
        assert!(config.window_state.is_maximised);
        assert!(config.discord_rpc);
    }

    #[test]
    fn test_mistyped_value_is_an_error() {
        let entries = vec![("discordRpc".to_string(), json!("yes"))];
        assert!(config_from_entries(entries).is_err());
    }

    #[test]
    fn test_one_key_per_field() {
        let entries = config_entries(&ShellConfig::default()).unwrap();
        let keys: Vec<_> = entries.iter().map(|(key, _)| key.as_str()).collect();
        assert!(keys.contains(&"hardwareAcceleration"));
        assert!(keys.contains(&"windowState"));
        assert_eq!(entries.len(), 7);

        let restored = config_from_entries(entries).unwrap().unwrap();
        assert_eq!(restored, ShellConfig::default());
    }
}
