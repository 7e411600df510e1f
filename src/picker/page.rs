//! Picker modal page and the `picker://` routes it calls back on.

use url::Url;

use super::types::{CaptureSource, SourceKind};

/// Request routed from the picker page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerRoute {
    Page,
    Pick(String),
    Cancel,
    NotFound,
}

impl PickerRoute {
    /// Route a request URI.
    ///
    /// Accepts both `picker://localhost/...` and the `http://picker.localhost/...`
    /// form Windows webviews use for custom schemes.
    pub fn parse(uri: &str) -> Self {
        let Ok(url) = Url::parse(uri) else {
            return PickerRoute::NotFound;
        };

        match url.path() {
            "" | "/" => PickerRoute::Page,
            "/cancel" => PickerRoute::Cancel,
            "/pick" => url
                .query_pairs()
                .find(|(key, _)| key == "id")
                .map(|(_, id)| PickerRoute::Pick(id.into_owned()))
                .unwrap_or(PickerRoute::NotFound),
            _ => PickerRoute::NotFound,
        }
    }
}

const STYLE: &str = r#"
  :root { color-scheme: dark; }
  body { margin: 0; padding: 16px; font-family: system-ui, sans-serif;
         background: #1e1f22; color: #f2f3f5; user-select: none; }
  header { display: flex; justify-content: space-between; align-items: center; }
  h1 { font-size: 16px; margin: 0; }
  h2 { font-size: 13px; text-transform: uppercase; color: #b5bac1; margin: 16px 0 8px; }
  .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 12px; }
  .source { display: flex; flex-direction: column; gap: 6px; padding: 8px; border-radius: 8px;
            border: none; background: #2b2d31; color: inherit; cursor: pointer; text-align: left; }
  .source:hover, .source:focus { background: #35373c; outline: 2px solid #5865f2; }
  .source img.thumb { width: 100%; aspect-ratio: 16 / 9; object-fit: contain; background: #111214; }
  .label { display: flex; gap: 6px; align-items: center; font-size: 13px;
           overflow: hidden; white-space: nowrap; text-overflow: ellipsis; }
  .label img { width: 16px; height: 16px; }
  button.cancel { background: #4e5058; color: inherit; border: none; border-radius: 4px;
                  padding: 6px 16px; cursor: pointer; }
"#;

const SCRIPT: &str = r#"
  const send = (path) => fetch(path).catch(() => {});
  document.querySelectorAll('.source').forEach((el) => {
    el.addEventListener('click', () => send('./pick?id=' + el.dataset.id));
  });
  document.getElementById('cancel').addEventListener('click', () => send('./cancel'));
  document.addEventListener('keydown', (event) => {
    if (event.key === 'Escape') send('./cancel');
  });
"#;

/// Render the modal page for the offered sources.
pub fn render(sources: &[CaptureSource]) -> String {
    let screens = section("Screens", sources, SourceKind::Screen);
    let windows = section("Windows", sources, SourceKind::Window);

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Share your screen</title>\
         <style>{STYLE}</style></head><body>\
         <header><h1>Share your screen</h1><button id=\"cancel\" class=\"cancel\">Cancel</button></header>\
         {screens}{windows}<script>{SCRIPT}</script></body></html>"
    )
}

fn section(title: &str, sources: &[CaptureSource], kind: SourceKind) -> String {
    let items: String = sources
        .iter()
        .filter(|source| source.kind() == Some(kind))
        .map(item)
        .collect();

    if items.is_empty() {
        return String::new();
    }
    format!("<h2>{}</h2><div class=\"grid\">{}</div>", title, items)
}

fn item(source: &CaptureSource) -> String {
    let icon = source
        .app_icon
        .as_deref()
        .map(|src| format!("<img src=\"{}\" alt=\"\">", escape_html(src)))
        .unwrap_or_default();

    format!(
        "<button class=\"source\" data-id=\"{id}\" title=\"{name}\">\
         <img class=\"thumb\" src=\"{thumb}\" alt=\"\">\
         <span class=\"label\">{icon}<span>{name}</span></span></button>",
        // Pre-encoded so the script can append it to the query untouched.
        id = escape_html(&urlencoding::encode(&source.id)),
        name = escape_html(&source.name),
        thumb = escape_html(&source.thumbnail),
        icon = icon,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, name: &str) -> CaptureSource {
        CaptureSource {
            id: id.into(),
            name: name.into(),
            thumbnail: "data:image/png;base64,AAAA".into(),
            app_icon: None,
        }
    }

    #[test]
    fn test_routes() {
        assert_eq!(PickerRoute::parse("picker://localhost/"), PickerRoute::Page);
        assert_eq!(PickerRoute::parse("http://picker.localhost/"), PickerRoute::Page);
        assert_eq!(PickerRoute::parse("picker://localhost/cancel"), PickerRoute::Cancel);
        assert_eq!(
            PickerRoute::parse("picker://localhost/pick?id=window%3A42"),
            PickerRoute::Pick("window:42".into())
        );
        assert_eq!(PickerRoute::parse("picker://localhost/pick"), PickerRoute::NotFound);
        assert_eq!(PickerRoute::parse("picker://localhost/favicon.ico"), PickerRoute::NotFound);
    }

    #[test]
    fn test_page_groups_sources() {
        let html = render(&[source("screen:1", "Display 1"), source("window:7", "Editor")]);
        let screens = html.find("<h2>Screens</h2>").unwrap();
        let windows = html.find("<h2>Windows</h2>").unwrap();
        assert!(screens < windows);
        assert!(html.contains("data-id=\"screen%3A1\""));
    }

    #[test]
    fn test_empty_section_is_omitted() {
        let html = render(&[source("screen:1", "Display 1"), source("screen:2", "Display 2")]);
        assert!(!html.contains("<h2>Windows</h2>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let html = render(&[source("window:1", "<script>alert(\"x\")</script>")]);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"));
    }
}
