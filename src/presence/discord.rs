//! Discord IPC transport.
//!
//! The IPC client is blocking, so every call runs on the blocking pool. The
//! client raises no events; a lost connection is detected by pinging the
//! pipe on a fixed interval. The activity itself is published once per
//! connection.

use discord_rich_presence::{activity, DiscordIpc, DiscordIpcClient};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::{PresenceActivity, PresenceSession, PresenceTransport};
use crate::error::{ShellError, ShellResult};

/// Application id registered with Discord.
pub const CLIENT_ID: &str = "872068124005007420";

const PING_INTERVAL: Duration = Duration::from_secs(15);

/// IPC frame opcode answered by the client with a pong.
const PING_OPCODE: u8 = 3;

#[derive(Debug, Default)]
pub struct DiscordTransport;

pub struct DiscordSession {
    client: Arc<Mutex<DiscordIpcClient>>,
}

impl PresenceTransport for DiscordTransport {
    type Session = DiscordSession;

    async fn connect(&self, activity: &PresenceActivity) -> ShellResult<DiscordSession> {
        let activity = activity.clone();

        let client = blocking(move || {
            let mut client = DiscordIpcClient::new(CLIENT_ID).map_err(presence_error)?;
            client.connect().map_err(presence_error)?;
            publish(&mut client, &activity)?;
            Ok(client)
        })
        .await?;

        Ok(DiscordSession {
            client: Arc::new(Mutex::new(client)),
        })
    }
}

impl PresenceSession for DiscordSession {
    async fn disconnected(&mut self) {
        loop {
            tokio::time::sleep(PING_INTERVAL).await;

            let client = Arc::clone(&self.client);
            let alive = blocking(move || ping(&mut client.lock())).await;
            if let Err(e) = alive {
                log::debug!("[PRESENCE] Ping failed: {}", e);
                return;
            }
        }
    }

    async fn close(self) {
        let client = self.client;
        let closed = blocking(move || client.lock().close().map_err(presence_error)).await;
        if let Err(e) = closed {
            log::debug!("[PRESENCE] Close failed: {}", e);
        }
    }
}

fn publish(client: &mut DiscordIpcClient, activity: &PresenceActivity) -> ShellResult<()> {
    let payload = activity::Activity::new()
        .state(activity.state)
        .details(activity.details)
        .assets(
            activity::Assets::new()
                .large_image(activity.large_image)
                .large_text(activity.large_text),
        )
        .buttons(vec![activity::Button::new(activity.button_label, activity.button_url)]);

    client.set_activity(payload).map_err(presence_error)
}

/// Write a ping and read one frame back; either side failing means the pipe
/// is gone.
fn ping(client: &mut DiscordIpcClient) -> ShellResult<()> {
    client
        .send(serde_json::json!({}), PING_OPCODE)
        .map_err(presence_error)?;
    client.recv().map_err(presence_error)?;
    Ok(())
}

fn presence_error(e: Box<dyn std::error::Error>) -> ShellError {
    ShellError::PresenceError(e.to_string())
}

async fn blocking<T, F>(f: F) -> ShellResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ShellResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ShellError::PresenceError(format!("IPC task failed: {}", e)))?
}
