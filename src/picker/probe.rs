//! Capture source enumeration using xcap.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use xcap::{Monitor, Window};

use super::types::{CaptureSource, SCREEN_PREFIX, WINDOW_PREFIX};
use crate::error::{ShellError, ShellResult};

pub const THUMBNAIL_WIDTH: u32 = 320;
pub const THUMBNAIL_HEIGHT: u32 = 180;

/// Something that can list capturable screens and windows.
///
/// Implementations may block; callers run them off the async runtime.
pub trait CaptureProbe: Send + Sync {
    fn probe(&self) -> ShellResult<Vec<CaptureSource>>;
}

/// Probe backed by the OS through xcap.
pub struct XcapProbe;

impl CaptureProbe for XcapProbe {
    fn probe(&self) -> ShellResult<Vec<CaptureSource>> {
        let mut sources = screens()?;
        // A window listing failure still leaves the screens usable.
        match windows() {
            Ok(found) => sources.extend(found),
            Err(e) => log::warn!("[PICKER] Window enumeration failed: {}", e),
        }
        log::debug!("[PICKER] Probe found {} sources", sources.len());
        Ok(sources)
    }
}

/// A captured source before its thumbnail is encoded.
struct Candidate {
    id: String,
    name: String,
    image: RgbaImage,
}

/// Encode each candidate's thumbnail, dropping only the ones that fail.
fn into_sources<E>(candidates: Vec<Candidate>, encode: E) -> Vec<CaptureSource>
where
    E: Fn(RgbaImage) -> ShellResult<String>,
{
    candidates
        .into_iter()
        .filter_map(|candidate| match encode(candidate.image) {
            Ok(thumbnail) => Some(CaptureSource {
                id: candidate.id,
                name: candidate.name,
                thumbnail,
                app_icon: None,
            }),
            Err(e) => {
                log::warn!("[PICKER] Skipping {}, thumbnail failed: {}", candidate.id, e);
                None
            },
        })
        .collect()
}

fn screens() -> ShellResult<Vec<CaptureSource>> {
    let monitors =
        Monitor::all().map_err(|e| ShellError::CaptureError(format!("Failed to get monitors: {}", e)))?;

    let mut candidates = Vec::with_capacity(monitors.len());
    for (idx, monitor) in monitors.iter().enumerate() {
        let image = match monitor.capture_image() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("[PICKER] Skipping monitor {}: {}", idx, e);
                continue;
            },
        };

        let id = monitor.id().unwrap_or(idx as u32);
        candidates.push(Candidate {
            id: format!("{}{}", SCREEN_PREFIX, id),
            name: monitor.name().unwrap_or_else(|_| format!("Screen {}", idx + 1)),
            image,
        });
    }
    Ok(into_sources(candidates, thumbnail_data_url))
}

fn windows() -> ShellResult<Vec<CaptureSource>> {
    let windows =
        Window::all().map_err(|e| ShellError::CaptureError(format!("Failed to get windows: {}", e)))?;

    let mut candidates = Vec::new();
    for window in windows.iter().filter(|w| is_window_pickable(w)) {
        let Ok(id) = window.id() else { continue };
        let image = match window.capture_image() {
            Ok(image) => image,
            Err(e) => {
                log::debug!("[PICKER] Skipping window {}: {}", id, e);
                continue;
            },
        };

        candidates.push(Candidate {
            id: format!("{}{}", WINDOW_PREFIX, id),
            name: window.title().unwrap_or_default(),
            image,
        });
    }
    Ok(into_sources(candidates, thumbnail_data_url))
}

/// Visible, titled, reasonably sized windows that are not shell furniture.
fn is_window_pickable(w: &Window) -> bool {
    if w.is_minimized().unwrap_or(true) {
        return false;
    }

    let title = w.title().unwrap_or_default();
    if title.is_empty() || w.width().unwrap_or(0) < 50 || w.height().unwrap_or(0) < 50 {
        return false;
    }

    let app_lower = w.app_name().unwrap_or_default().to_lowercase();
    if (app_lower == "explorer.exe" || app_lower == "explorer") && title.eq_ignore_ascii_case("program manager") {
        return false;
    }

    !(app_lower.contains("textinputhost")
        || app_lower.contains("searchhost")
        || app_lower.contains("shellexperiencehost")
        || app_lower.contains("lockapp"))
}

/// Downscale to fit the thumbnail box and encode as a PNG data URL.
pub fn thumbnail_data_url(image: RgbaImage) -> ShellResult<String> {
    let thumbnail = DynamicImage::ImageRgba8(image).thumbnail(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT);

    let mut buffer = Cursor::new(Vec::new());
    thumbnail.write_to(&mut buffer, image::ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(buffer.get_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_fits_box_and_keeps_aspect() {
        let image = RgbaImage::from_pixel(1920, 1080, image::Rgba([10, 20, 30, 255]));
        let url = thumbnail_data_url(image).unwrap();

        let encoded = url.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 180));
    }

    #[test]
    fn test_failed_thumbnail_only_drops_its_source() {
        let candidate = |id: &str, width: u32| Candidate {
            id: id.into(),
            name: format!("{} name", id),
            image: RgbaImage::new(width, 10),
        };
        let candidates = vec![candidate("screen:1", 10), candidate("window:2", 13), candidate("window:3", 10)];

        let sources = into_sources(candidates, |image| {
            if image.width() == 13 {
                Err(ShellError::ImageError("encoder refused".into()))
            } else {
                thumbnail_data_url(image)
            }
        });

        let ids: Vec<_> = sources.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["screen:1", "window:3"]);
        assert!(sources.iter().all(|s| s.thumbnail.starts_with("data:image/png;base64,")));
    }

    #[test]
    fn test_small_images_are_not_upscaled_past_box() {
        let image = RgbaImage::from_pixel(100, 400, image::Rgba([0, 0, 0, 255]));
        let url = thumbnail_data_url(image).unwrap();
        let bytes = STANDARD
            .decode(url.strip_prefix("data:image/png;base64,").unwrap())
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() <= THUMBNAIL_WIDTH);
        assert!(decoded.height() <= THUMBNAIL_HEIGHT);
    }
}
