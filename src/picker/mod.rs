//! Capture source picker.
//!
//! `idle -> probing -> (auto-resolved | awaiting-selection) -> resolved`
//!
//! [`Picker::request`] probes the OS, resolves immediately for zero or one
//! source, and otherwise opens a modal and waits for the session to settle.
//! Only one request can be in flight; a second one is rejected with
//! [`ShellError::PickerBusy`] without touching the first. A probe or modal
//! failure is logged and resolves with no selection.

pub mod page;
pub mod probe;
pub mod session;
pub mod types;
pub mod window;

#[cfg(test)]
mod tests;

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{ShellError, ShellResult};
pub use page::PickerRoute;
pub use probe::{CaptureProbe, XcapProbe};
pub use session::{PickerSession, Settlement};
pub use types::{CaptureSource, PickedSource, SourceKind};

/// Label prefix of modal windows. Every request opens its own
/// `picker-<n>` window so events from an older one are told apart.
pub const WINDOW_LABEL_PREFIX: &str = "picker-";

pub fn is_picker_window(label: &str) -> bool {
    label.starts_with(WINDOW_LABEL_PREFIX)
}

/// What to do with a probe result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerPlan {
    NoSources,
    Single(PickedSource),
    Choose(Vec<CaptureSource>),
}

pub fn decide(mut sources: Vec<CaptureSource>) -> PickerPlan {
    match sources.len() {
        0 => PickerPlan::NoSources,
        1 => PickerPlan::Single(sources.remove(0).picked()),
        _ => PickerPlan::Choose(sources),
    }
}

/// Response to a route request from the modal page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteReply {
    Html(String),
    Settled(Settlement),
    /// No session, or the session already settled.
    Gone,
    NotFound,
}

/// Clears the in-flight flag when the request finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The open session and the window showing it.
struct ActiveSession {
    window: String,
    session: PickerSession,
}

pub struct Picker {
    probe: Arc<dyn CaptureProbe>,
    in_flight: AtomicBool,
    next_window: AtomicU64,
    active: Mutex<Option<ActiveSession>>,
}

impl Picker {
    pub fn new(probe: Arc<dyn CaptureProbe>) -> Self {
        Self {
            probe,
            in_flight: AtomicBool::new(false),
            next_window: AtomicU64::new(1),
            active: Mutex::new(None),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one picker invocation.
    ///
    /// Both callbacks only run when there is a choice to make. `prepare`
    /// clears leftovers before the session is registered; `open_modal` then
    /// shows the sources in a window with the given label. Only that window
    /// can settle the session.
    pub async fn request<P, F>(&self, prepare: P, open_modal: F) -> ShellResult<Option<PickedSource>>
    where
        P: FnOnce() -> ShellResult<()>,
        F: FnOnce(&str, &[CaptureSource]) -> ShellResult<()>,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("[PICKER] Request rejected, another picker is open");
            return Err(ShellError::PickerBusy);
        }
        let _in_flight = InFlight(&self.in_flight);

        let probe = Arc::clone(&self.probe);
        let probed = tokio::task::spawn_blocking(move || probe.probe())
            .await
            .map_err(|e| ShellError::CaptureError(format!("Probe task failed: {}", e)))
            .and_then(|result| result);
        let sources = match probed {
            Ok(sources) => sources,
            Err(e) => {
                log::error!("[PICKER] Source probe failed: {}", e);
                return Ok(None);
            },
        };

        let sources = match decide(sources) {
            PickerPlan::NoSources => {
                log::info!("[PICKER] No capture sources available");
                return Ok(None);
            },
            PickerPlan::Single(source) => {
                log::info!("[PICKER] Single source {}, skipping modal", source.id);
                return Ok(Some(source));
            },
            PickerPlan::Choose(sources) => sources,
        };

        if let Err(e) = prepare() {
            log::error!("[PICKER] Failed to prepare picker modal: {}", e);
            return Ok(None);
        }

        // The lock is released before the modal opens: loading the page calls
        // back into `handle_route`.
        let window = format!(
            "{}{}",
            WINDOW_LABEL_PREFIX,
            self.next_window.fetch_add(1, Ordering::SeqCst)
        );
        let (session, settled) = PickerSession::new(sources.clone());
        *self.active.lock() = Some(ActiveSession {
            window: window.clone(),
            session,
        });

        if let Err(e) = open_modal(&window, &sources) {
            log::error!("[PICKER] Failed to open picker modal: {}", e);
            self.active.lock().take();
            return Ok(None);
        }

        // A dropped sender means the session was discarded unsettled.
        let result = settled.await.unwrap_or(None);
        self.active.lock().take();

        match &result {
            Some(source) => log::info!("[PICKER] Picked {}", source.id),
            None => log::info!("[PICKER] Picker closed without a selection"),
        }
        Ok(result)
    }

    /// Serve a request from the modal page shown in `window`.
    pub fn handle_route(&self, window: &str, route: PickerRoute) -> RouteReply {
        let mut slot = self.active.lock();
        let Some(active) = slot.as_mut().filter(|active| active.window == window) else {
            return match route {
                PickerRoute::NotFound => RouteReply::NotFound,
                _ => RouteReply::Gone,
            };
        };

        let session = &mut active.session;
        let settled = match route {
            PickerRoute::Page => return RouteReply::Html(page::render(session.sources())),
            PickerRoute::NotFound => return RouteReply::NotFound,
            PickerRoute::Pick(id) => session.pick(&id),
            PickerRoute::Cancel => session.cancel(),
        };
        settled.map_or(RouteReply::Gone, RouteReply::Settled)
    }

    /// A modal window was destroyed. Windows from earlier requests are
    /// ignored.
    pub fn window_closed(&self, window: &str) {
        let mut slot = self.active.lock();
        let Some(active) = slot.as_mut().filter(|active| active.window == window) else {
            return;
        };
        if active.session.window_closed().is_some() {
            log::debug!("[PICKER] Modal closed before a selection was made");
        }
    }
}
