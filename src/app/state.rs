//! Managed shell state.

use parking_lot::Mutex;
use std::sync::Arc;
use url::Url;

use crate::badge::{sink::BadgeSink, BadgeRenderer};
use crate::config::ConfigStore;
use crate::lifecycle::{AppMeta, DeepLinkQueue, NavigationGuard, WindowLifecycle};
use crate::picker::{Picker, XcapProbe};
use crate::presence::{discord::DiscordTransport, PresenceClient};

/// Everything the shell coordinates, managed once by Tauri.
///
/// Locks are short and never held across `.await`.
pub struct Shell {
    pub config: ConfigStore,
    pub server_url: Url,
    pub navigation: Arc<NavigationGuard>,
    pub meta: AppMeta,
    pub lifecycle: Mutex<WindowLifecycle>,
    pub deep_links: Mutex<DeepLinkQueue>,
    pub badge: Mutex<BadgeRenderer>,
    pub badge_sink: BadgeSink,
    pub picker: Picker,
    pub presence: PresenceClient<DiscordTransport>,
}

impl Shell {
    pub fn new(config: ConfigStore, server_url: Url) -> Self {
        let navigation = Arc::new(NavigationGuard::new(&server_url));
        Self {
            config,
            server_url,
            navigation,
            meta: AppMeta::default(),
            lifecycle: Mutex::new(WindowLifecycle::for_current_platform()),
            deep_links: Mutex::new(DeepLinkQueue::new()),
            badge: Mutex::new(BadgeRenderer::for_current_platform()),
            badge_sink: BadgeSink::new(),
            picker: Picker::new(Arc::new(XcapProbe)),
            presence: PresenceClient::new(DiscordTransport),
        }
    }
}
