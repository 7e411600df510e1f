use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::*;

struct FakeProbe(Vec<CaptureSource>);

impl CaptureProbe for FakeProbe {
    fn probe(&self) -> ShellResult<Vec<CaptureSource>> {
        Ok(self.0.clone())
    }
}

struct FailingProbe;

impl CaptureProbe for FailingProbe {
    fn probe(&self) -> ShellResult<Vec<CaptureSource>> {
        Err(ShellError::CaptureError("no display".into()))
    }
}

fn source(id: &str) -> CaptureSource {
    CaptureSource {
        id: id.into(),
        name: format!("{} name", id),
        thumbnail: "data:image/png;base64,AAAA".into(),
        app_icon: None,
    }
}

fn picker(ids: &[&str]) -> Arc<Picker> {
    Arc::new(Picker::new(Arc::new(FakeProbe(
        ids.iter().map(|id| source(id)).collect(),
    ))))
}

type Request = JoinHandle<ShellResult<Option<PickedSource>>>;

/// Start a request in the background and wait until its modal is open.
/// Returns the request and the label of the modal window.
async fn open(picker: &Arc<Picker>) -> (Request, String) {
    let (opened_tx, opened_rx) = oneshot::channel();
    let picker = Arc::clone(picker);
    let handle = tokio::spawn(async move {
        picker
            .request(
                || Ok(()),
                move |label, _| {
                    let _ = opened_tx.send(label.to_string());
                    Ok(())
                },
            )
            .await
    });
    let label = opened_rx.await.unwrap();
    (handle, label)
}

#[test]
fn test_decide_by_source_count() {
    assert_eq!(decide(vec![]), PickerPlan::NoSources);
    assert_eq!(
        decide(vec![source("screen:1")]),
        PickerPlan::Single(PickedSource {
            id: "screen:1".into(),
            name: "screen:1 name".into(),
        })
    );
    assert!(matches!(
        decide(vec![source("screen:1"), source("window:2")]),
        PickerPlan::Choose(sources) if sources.len() == 2
    ));
}

#[tokio::test]
async fn test_no_sources_resolves_without_modal() {
    let picker = picker(&[]);
    let result = picker
        .request(|| panic!("nothing to clean up"), |_, _| panic!("modal must not open"))
        .await
        .unwrap();
    assert_eq!(result, None);
    assert!(!picker.is_busy());
}

#[tokio::test]
async fn test_single_source_resolves_without_modal() {
    let picker = picker(&["screen:1"]);
    let result = picker
        .request(|| panic!("nothing to clean up"), |_, _| panic!("modal must not open"))
        .await
        .unwrap();
    assert_eq!(result.map(|s| s.id), Some("screen:1".into()));
}

#[tokio::test]
async fn test_modal_windows_get_fresh_labels() {
    let picker = picker(&["screen:1", "window:2"]);

    let (first, first_label) = open(&picker).await;
    picker.window_closed(&first_label);
    assert_eq!(first.await.unwrap().unwrap(), None);

    let (second, second_label) = open(&picker).await;
    assert!(is_picker_window(&first_label));
    assert!(is_picker_window(&second_label));
    assert_ne!(first_label, second_label);

    picker.window_closed(&second_label);
    assert_eq!(second.await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn test_pick_settles_exactly_once() {
    let picker = picker(&["screen:1", "window:2"]);
    let (handle, label) = open(&picker).await;

    assert_eq!(
        picker.handle_route(&label, PickerRoute::Pick("window:2".into())),
        RouteReply::Settled(Settlement::Picked)
    );
    // Later clicks and cancels are ignored.
    assert_eq!(picker.handle_route(&label, PickerRoute::Cancel), RouteReply::Gone);
    picker.window_closed(&label);

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.map(|s| s.id), Some("window:2".into()));
    assert!(!picker.is_busy());
}

#[tokio::test]
async fn test_cancel_settles_with_no_selection() {
    let picker = picker(&["screen:1", "screen:2"]);
    let (handle, label) = open(&picker).await;

    assert_eq!(
        picker.handle_route(&label, PickerRoute::Cancel),
        RouteReply::Settled(Settlement::Cancelled)
    );
    assert_eq!(handle.await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn test_force_closed_window_settles_with_no_selection() {
    let picker = picker(&["screen:1", "window:2"]);
    let (handle, label) = open(&picker).await;

    picker.window_closed(&label);

    assert_eq!(handle.await.unwrap().unwrap(), None);
    assert!(!picker.is_busy());
}

#[tokio::test]
async fn test_unknown_id_settles_with_no_selection() {
    let picker = picker(&["screen:1", "window:2"]);
    let (handle, label) = open(&picker).await;

    assert_eq!(
        picker.handle_route(&label, PickerRoute::Pick("window:999".into())),
        RouteReply::Settled(Settlement::UnknownSource)
    );
    assert_eq!(handle.await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn test_second_request_is_busy_and_first_survives() {
    let picker = picker(&["screen:1", "window:2"]);
    let (handle, label) = open(&picker).await;

    let second = picker
        .request(|| panic!("first modal must stay"), |_, _| panic!("second modal must not open"))
        .await;
    assert!(matches!(second, Err(ShellError::PickerBusy)));

    // The first session still serves its page and accepts a pick.
    assert!(matches!(picker.handle_route(&label, PickerRoute::Page), RouteReply::Html(_)));
    assert_eq!(
        picker.handle_route(&label, PickerRoute::Pick("screen:1".into())),
        RouteReply::Settled(Settlement::Picked)
    );
    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.map(|s| s.id), Some("screen:1".into()));

    // Once settled a new request goes through.
    let (third, third_label) = open(&picker).await;
    assert_eq!(
        picker.handle_route(&third_label, PickerRoute::Cancel),
        RouteReply::Settled(Settlement::Cancelled)
    );
    assert_eq!(third.await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn test_modal_open_failure_resolves_with_no_selection() {
    let picker = picker(&["screen:1", "window:2"]);
    let result = picker
        .request(|| Ok(()), |_, _| Err(ShellError::WindowError("no display".into())))
        .await;
    assert!(matches!(result, Ok(None)));
    assert!(!picker.is_busy());
}

#[tokio::test]
async fn test_cleanup_failure_resolves_with_no_selection() {
    let picker = picker(&["screen:1", "window:2"]);
    let result = picker
        .request(
            || Err(ShellError::WindowError("stale window stuck".into())),
            |_, _| panic!("modal must not open"),
        )
        .await;
    assert!(matches!(result, Ok(None)));
    assert!(!picker.is_busy());
}

#[tokio::test]
async fn test_probe_failure_resolves_with_no_selection() {
    let picker = Picker::new(Arc::new(FailingProbe));
    let result = picker
        .request(|| panic!("nothing to clean up"), |_, _| panic!("modal must not open"))
        .await;
    assert!(matches!(result, Ok(None)));
    assert!(!picker.is_busy());
}

#[tokio::test]
async fn test_stale_window_close_does_not_settle_new_session() {
    let picker = picker(&["screen:1", "window:2"]);

    let (first, stale_label) = open(&picker).await;
    picker.handle_route(&stale_label, PickerRoute::Cancel);
    assert_eq!(first.await.unwrap().unwrap(), None);

    let (handle, label) = open(&picker).await;

    // The old window's close and clicks arrive after the new modal opened.
    picker.window_closed(&stale_label);
    assert_eq!(
        picker.handle_route(&stale_label, PickerRoute::Pick("screen:1".into())),
        RouteReply::Gone
    );

    // The new session is still waiting for the user.
    assert!(matches!(picker.handle_route(&label, PickerRoute::Page), RouteReply::Html(_)));
    assert_eq!(
        picker.handle_route(&label, PickerRoute::Pick("window:2".into())),
        RouteReply::Settled(Settlement::Picked)
    );
    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.map(|s| s.id), Some("window:2".into()));
}

#[test]
fn test_routes_without_session() {
    let picker = picker(&["screen:1", "window:2"]);
    assert_eq!(picker.handle_route("picker-1", PickerRoute::Page), RouteReply::Gone);
    assert_eq!(picker.handle_route("picker-1", PickerRoute::NotFound), RouteReply::NotFound);
    picker.window_closed("picker-1");
}
