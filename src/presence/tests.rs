use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use super::*;
use crate::error::ShellError;

#[derive(Default)]
struct Counters {
    attempts: AtomicUsize,
    closed: AtomicUsize,
    fail: AtomicBool,
    drop_link: Notify,
}

struct FakeTransport(Arc<Counters>);

struct FakeSession(Arc<Counters>);

impl PresenceTransport for FakeTransport {
    type Session = FakeSession;

    async fn connect(&self, activity: &PresenceActivity) -> ShellResult<FakeSession> {
        assert_eq!(activity.state, "mutinyapp.gg");
        self.0.attempts.fetch_add(1, Ordering::SeqCst);
        if self.0.fail.load(Ordering::SeqCst) {
            return Err(ShellError::PresenceError("pipe not found".into()));
        }
        Ok(FakeSession(Arc::clone(&self.0)))
    }
}

impl PresenceSession for FakeSession {
    async fn disconnected(&mut self) {
        self.0.drop_link.notified().await;
    }

    async fn close(self) {
        self.0.closed.fetch_add(1, Ordering::SeqCst);
    }
}

fn client(fail: bool) -> (PresenceClient<FakeTransport>, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    counters.fail.store(fail, Ordering::SeqCst);
    (PresenceClient::new(FakeTransport(Arc::clone(&counters))), counters)
}

/// Let spawned tasks run without moving the clock.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

async fn advance(secs: u64) {
    tokio::time::advance(Duration::from_secs(secs)).await;
    settle().await;
}

#[test]
fn test_default_activity() {
    let activity = PresenceActivity::default();
    assert_eq!(activity.details, "Chatting with others");
    assert_eq!(activity.large_image, "qr");
    assert_eq!(activity.large_text, "Join Mutiny!");
    assert_eq!(activity.button_label, "Join Mutiny");
    assert_eq!(activity.button_url, "https://mutinyapp.gg/");
}

#[tokio::test(start_paused = true)]
async fn test_connect_failure_schedules_exactly_one_reconnect() {
    let (client, counters) = client(true);
    client.init(true);
    settle().await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);

    advance(9).await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);

    advance(1).await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 2);

    // Not exponential: the next retry is again 10 s later.
    advance(10).await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_destroy_cancels_pending_reconnect() {
    let (client, counters) = client(true);
    client.init(true);
    settle().await;

    advance(5).await;
    client.destroy();
    assert!(!client.is_active());

    advance(30).await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_reconnects_after_delay() {
    let (client, counters) = client(false);
    client.init(true);
    settle().await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);

    counters.drop_link.notify_one();
    settle().await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);

    advance(10).await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reinit_replaces_previous_connection() {
    let (client, counters) = client(false);
    client.init(true);
    settle().await;
    assert_eq!(client.generation(), 1);

    client.init(true);
    settle().await;
    assert_eq!(client.generation(), 2);
    assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 2);

    client.destroy();
    settle().await;
    assert_eq!(counters.closed.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_init_tears_down() {
    let (client, counters) = client(false);
    client.init(true);
    settle().await;

    client.init(false);
    settle().await;
    assert!(!client.is_active());
    assert_eq!(counters.closed.load(Ordering::SeqCst), 1);

    advance(60).await;
    assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_destroy_without_connection_is_noop() {
    let (client, counters) = client(false);
    client.destroy();
    client.destroy();
    assert_eq!(client.generation(), 0);
    assert_eq!(counters.closed.load(Ordering::SeqCst), 0);
}
