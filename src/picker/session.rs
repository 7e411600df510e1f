//! One picker invocation awaiting a user choice.

use tokio::sync::oneshot;

use super::types::{CaptureSource, PickedSource};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Picked,
    Cancelled,
    WindowClosed,
    /// The id did not match an offered source.
    UnknownSource,
}

/// Offered sources plus the single-use result slot.
///
/// The slot is an `Option<oneshot::Sender>` taken by the first settlement, so
/// later settlements are no-ops by construction.
pub struct PickerSession {
    sources: Vec<CaptureSource>,
    slot: Option<oneshot::Sender<Option<PickedSource>>>,
}

impl PickerSession {
    pub fn new(sources: Vec<CaptureSource>) -> (Self, oneshot::Receiver<Option<PickedSource>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sources,
                slot: Some(tx),
            },
            rx,
        )
    }

    pub fn sources(&self) -> &[CaptureSource] {
        &self.sources
    }

    /// Settle with the source whose id is `id`; an unknown id settles with
    /// "no selection". Returns `None` if the session was already settled.
    pub fn pick(&mut self, id: &str) -> Option<Settlement> {
        match self.sources.iter().find(|source| source.id == id) {
            Some(source) => {
                let picked = source.picked();
                self.settle(Some(picked)).then_some(Settlement::Picked)
            },
            None => {
                log::warn!("[PICKER] Pick for unknown source {:?}", id);
                self.settle(None).then_some(Settlement::UnknownSource)
            },
        }
    }

    pub fn cancel(&mut self) -> Option<Settlement> {
        self.settle(None).then_some(Settlement::Cancelled)
    }

    /// The modal went away without a choice.
    pub fn window_closed(&mut self) -> Option<Settlement> {
        self.settle(None).then_some(Settlement::WindowClosed)
    }

    fn settle(&mut self, result: Option<PickedSource>) -> bool {
        let Some(tx) = self.slot.take() else {
            return false;
        };
        // The receiver is gone only if the requesting command was dropped.
        if tx.send(result).is_err() {
            log::debug!("[PICKER] Requester went away before settlement");
        }
        true
    }
}

impl Drop for PickerSession {
    fn drop(&mut self) {
        self.window_closed();
    }
}
