//! Picker modal window and `picker://` protocol handler.

use std::borrow::Cow;

use tauri::http::{header, HeaderValue, Request, Response, StatusCode};
use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindowBuilder};

use super::{is_picker_window, Picker, PickerRoute, RouteReply};
use crate::app::window::MAIN_WINDOW_LABEL;
use crate::error::{ShellError, ShellResult};

pub const PICKER_SCHEME: &str = "picker";

/// Windows webviews expose custom schemes as `http://<scheme>.localhost`.
#[cfg(target_os = "windows")]
const PICKER_ROOT: &str = "http://picker.localhost/";
#[cfg(not(target_os = "windows"))]
const PICKER_ROOT: &str = "picker://localhost/";

/// Destroy picker windows left over from earlier requests.
pub fn destroy_stale_modals<R: Runtime>(app: &AppHandle<R>) -> ShellResult<()> {
    for (label, stale) in app.webview_windows() {
        if is_picker_window(&label) {
            log::warn!("[PICKER] Destroying stale picker window {}", label);
            stale.destroy()?;
        }
    }
    Ok(())
}

/// Open the modal as `label` over the main window.
pub fn open_modal<R: Runtime>(app: &AppHandle<R>, label: &str) -> ShellResult<()> {
    let root = url::Url::parse(PICKER_ROOT)
        .map_err(|e| ShellError::WindowError(format!("Invalid picker URL: {}", e)))?;

    let mut builder = WebviewWindowBuilder::new(app, label, WebviewUrl::CustomProtocol(root))
        .title("Share your screen")
        .inner_size(760.0, 540.0)
        .center()
        .resizable(false)
        .minimizable(false)
        .maximizable(false)
        .decorations(false)
        .focused(true);

    if let Some(main) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        builder = builder.parent(&main)?;
    }

    builder.build()?;
    Ok(())
}

/// Close the modal once the current protocol response has gone out.
///
/// Destroying a webview from inside its own scheme handler runs inline on the
/// main thread, so the close is handed to the async runtime.
fn close_modal_later<R: Runtime>(app: &AppHandle<R>, label: &str) {
    let app = app.clone();
    let label = label.to_string();
    tauri::async_runtime::spawn(async move {
        close_modal(&app, &label);
    });
}

/// Close the modal after its session settled.
fn close_modal<R: Runtime>(app: &AppHandle<R>, label: &str) {
    if let Some(window) = app.get_webview_window(label) {
        if let Err(e) = window.destroy() {
            log::warn!("[PICKER] Failed to close picker window: {}", e);
        }
    }
}

/// Handler for the `picker://` scheme, called for the webview `label`.
pub fn handle_protocol<R: Runtime>(
    app: &AppHandle<R>,
    label: &str,
    picker: &Picker,
    request: &Request<Vec<u8>>,
) -> Response<Cow<'static, [u8]>> {
    let route = PickerRoute::parse(&request.uri().to_string());
    log::debug!("[PICKER] {} {} -> {:?}", label, request.uri(), route);

    let (response, after) = reply_response(picker.handle_route(label, route));
    if after == AfterResponse::CloseModal {
        close_modal_later(app, label);
    }
    response
}

/// What happens to the modal once the response is out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterResponse {
    KeepOpen,
    CloseModal,
}

fn reply_response(reply: RouteReply) -> (Response<Cow<'static, [u8]>>, AfterResponse) {
    match reply {
        RouteReply::Html(html) => (
            respond(StatusCode::OK, "text/html; charset=utf-8", html.into_bytes()),
            AfterResponse::KeepOpen,
        ),
        RouteReply::Settled(settlement) => {
            log::debug!("[PICKER] Session settled: {:?}", settlement);
            (
                respond(StatusCode::NO_CONTENT, "text/plain", Vec::new()),
                AfterResponse::CloseModal,
            )
        },
        RouteReply::Gone => (
            respond(StatusCode::GONE, "text/plain", Vec::new()),
            AfterResponse::CloseModal,
        ),
        RouteReply::NotFound => (
            respond(StatusCode::NOT_FOUND, "text/plain", Vec::new()),
            AfterResponse::KeepOpen,
        ),
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Owned(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
