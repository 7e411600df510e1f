//! Deep-link detection and delivery timing.

use std::time::Duration;

/// Custom URL scheme registered for this app.
pub const SCHEME: &str = "mutiny";

/// Event the hosted content listens on for deep links.
pub const PROTOCOL_URL_EVENT: &str = "protocol-url";

/// Delay between the main page finishing its load and delivering queued
/// links, so the content has registered its listener.
pub const DELIVERY_DELAY: Duration = Duration::from_secs(1);

/// Where a deep link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLinkSource {
    /// Arguments of this process (Windows/Linux cold start).
    LaunchArgs,
    /// Arguments forwarded from a second instance that exited.
    SecondInstance,
    /// OS open-url event (macOS).
    OpenUrlEvent,
}

impl DeepLinkSource {
    /// Whether the main window should be brought to the front first.
    pub fn activates_window(self) -> bool {
        !matches!(self, DeepLinkSource::LaunchArgs)
    }
}

/// What to do with an offered link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPlan {
    /// The content is loaded; emit now.
    Immediate(String),
    /// Held until the main page finishes loading.
    Queued,
}

/// Holds links while the main page is absent or still loading.
///
/// `page_loading` fires for every new main window and every reload,
/// `window_gone` when the main window is destroyed. `page_loaded` hands back
/// everything queued, to be emitted after [`DELIVERY_DELAY`].
#[derive(Debug, Default)]
pub struct DeepLinkQueue {
    ready: bool,
    pending: Vec<String>,
}

impl DeepLinkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, url: String) -> DeliveryPlan {
        if self.ready {
            DeliveryPlan::Immediate(url)
        } else {
            self.pending.push(url);
            DeliveryPlan::Queued
        }
    }

    pub fn page_loading(&mut self) {
        self.ready = false;
    }

    pub fn page_loaded(&mut self) -> Vec<String> {
        self.ready = true;
        std::mem::take(&mut self.pending)
    }

    pub fn window_gone(&mut self) {
        self.ready = false;
    }
}

/// Whether `candidate` is a URL under the app scheme.
pub fn is_deep_link(candidate: &str) -> bool {
    candidate
        .strip_prefix(SCHEME)
        .is_some_and(|rest| rest.starts_with("://"))
}

/// First argument that is a deep link.
pub fn find_deep_link<I, S>(args: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .find(|arg| is_deep_link(arg.as_ref()))
        .map(|arg| arg.as_ref().to_string())
}
