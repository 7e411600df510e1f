//! Deep-link delivery to the hosted content.

use tauri::{AppHandle, Emitter, Manager, Runtime};

use super::state::Shell;
use super::window::{dispatch, MAIN_WINDOW_LABEL};
use crate::lifecycle::deep_link::{DeepLinkSource, DeliveryPlan, DELIVERY_DELAY, PROTOCOL_URL_EVENT};
use crate::lifecycle::WindowEvent;

/// Forward `url` to the content on the `protocol-url` channel, holding it
/// until the main page has loaded.
pub fn deliver<R: Runtime>(app: &AppHandle<R>, url: String, source: DeepLinkSource) {
    log::info!("[DEEPLINK] {} from {:?}", url, source);

    // May rebuild the main window, which resets the queue to loading.
    if source.activates_window() {
        dispatch(app, WindowEvent::Activate);
    }

    let plan = app.state::<Shell>().deep_links.lock().offer(url);
    match plan {
        DeliveryPlan::Immediate(url) => emit(app, &url),
        DeliveryPlan::Queued => log::debug!("[DEEPLINK] Held until the main page loads"),
    }
}

/// The main page started loading (new window or reload).
pub fn page_loading<R: Runtime>(app: &AppHandle<R>) {
    app.state::<Shell>().deep_links.lock().page_loading();
}

/// The main page finished loading; flush held links after a short delay.
pub fn page_loaded<R: Runtime>(app: &AppHandle<R>) {
    let pending = app.state::<Shell>().deep_links.lock().page_loaded();
    if pending.is_empty() {
        return;
    }

    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(DELIVERY_DELAY).await;
        for url in pending {
            emit(&app, &url);
        }
    });
}

/// The main window was destroyed.
pub fn window_gone<R: Runtime>(app: &AppHandle<R>) {
    app.state::<Shell>().deep_links.lock().window_gone();
}

fn emit<R: Runtime>(app: &AppHandle<R>, url: &str) {
    if let Err(e) = app.emit_to(MAIN_WINDOW_LABEL, PROTOCOL_URL_EVENT, url) {
        log::warn!("[DEEPLINK] Failed to deliver {}: {}", url, e);
    }
}
