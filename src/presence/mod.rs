//! Rich presence client.
//!
//! `disabled -> connecting -> connected -> (disconnected -> connecting after 10s)`
//!
//! Every [`PresenceClient::init`] bumps the generation and cancels the token
//! of the previous connection task, so at most one connection (and at most
//! one pending reconnect timer) is alive at any time. Failures are logged and
//! retried, never returned.

pub mod discord;

#[cfg(test)]
mod tests;

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::ShellResult;

/// Fixed delay before a reconnect attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Activity published once per connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceActivity {
    pub state: &'static str,
    pub details: &'static str,
    pub large_image: &'static str,
    pub large_text: &'static str,
    pub button_label: &'static str,
    pub button_url: &'static str,
}

impl Default for PresenceActivity {
    fn default() -> Self {
        Self {
            state: "mutinyapp.gg",
            details: "Chatting with others",
            large_image: "qr",
            large_text: "Join Mutiny!",
            button_label: "Join Mutiny",
            button_url: "https://mutinyapp.gg/",
        }
    }
}

/// Connects to the presence service.
pub trait PresenceTransport: Send + Sync + 'static {
    type Session: PresenceSession;

    /// Connect and publish `activity` once the service is ready.
    fn connect(&self, activity: &PresenceActivity) -> impl Future<Output = ShellResult<Self::Session>> + Send;
}

/// A live connection.
pub trait PresenceSession: Send + 'static {
    /// Resolves once the connection is lost.
    fn disconnected(&mut self) -> impl Future<Output = ()> + Send;

    /// Release the connection.
    fn close(self) -> impl Future<Output = ()> + Send;
}

#[derive(Default)]
struct Attachment {
    generation: u64,
    cancel: Option<CancellationToken>,
}

pub struct PresenceClient<T: PresenceTransport> {
    transport: Arc<T>,
    activity: PresenceActivity,
    attachment: Mutex<Attachment>,
}

impl<T: PresenceTransport> PresenceClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            activity: PresenceActivity::default(),
            attachment: Mutex::new(Attachment::default()),
        }
    }

    /// Generation of the current connection task; 0 before the first init.
    pub fn generation(&self) -> u64 {
        self.attachment.lock().generation
    }

    pub fn is_active(&self) -> bool {
        self.attachment.lock().cancel.is_some()
    }

    /// (Re)start presence when `enabled`, otherwise tear it down.
    ///
    /// Must be called from within the tokio runtime.
    pub fn init(&self, enabled: bool) {
        if !enabled {
            log::debug!("[PRESENCE] Disabled by config");
            self.destroy();
            return;
        }

        let token = CancellationToken::new();
        let generation = {
            let mut attachment = self.attachment.lock();
            if let Some(previous) = attachment.cancel.replace(token.clone()) {
                previous.cancel();
            }
            attachment.generation += 1;
            attachment.generation
        };

        log::info!("[PRESENCE] Starting connection (generation {})", generation);
        tokio::spawn(run(
            Arc::clone(&self.transport),
            self.activity.clone(),
            generation,
            token,
        ));
    }

    /// Release the connection if there is one and cancel any pending
    /// reconnect. No-op when nothing is running.
    pub fn destroy(&self) {
        if let Some(token) = self.attachment.lock().cancel.take() {
            log::info!("[PRESENCE] Destroying connection");
            token.cancel();
        }
    }
}

/// Connection loop of one generation. Ends only when `token` is cancelled.
async fn run<T: PresenceTransport>(
    transport: Arc<T>,
    activity: PresenceActivity,
    generation: u64,
    token: CancellationToken,
) {
    loop {
        let connected = tokio::select! {
            _ = token.cancelled() => return,
            result = transport.connect(&activity) => result,
        };

        match connected {
            Ok(mut session) => {
                log::info!("[PRESENCE] Connected (generation {})", generation);
                let cancelled = tokio::select! {
                    _ = token.cancelled() => true,
                    _ = session.disconnected() => false,
                };
                if cancelled {
                    session.close().await;
                    log::debug!("[PRESENCE] Closed (generation {})", generation);
                    return;
                }
                log::warn!("[PRESENCE] Disconnected (generation {})", generation);
            },
            Err(e) => log::warn!("[PRESENCE] Connect failed (generation {}): {}", generation, e),
        }

        log::debug!("[PRESENCE] Reconnecting in {:?}", RECONNECT_DELAY);
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(RECONNECT_DELAY) => {},
        }
    }
}
