//! Hosted content origin.
//!
//! The shell loads `https://mutinyapp.gg` unless a different build is forced
//! on the command line with `--force-server=<url>` (or `--force-server <url>`).

use url::Url;

pub const DEFAULT_SERVER_URL: &str = "https://mutinyapp.gg";

const FORCE_SERVER_SWITCH: &str = "--force-server";

/// Resolve the content URL from process arguments.
///
/// An unparseable override is logged and ignored.
pub fn server_url_from_args<I, S>(args: I) -> Url
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter();
    let mut forced = None;

    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        if let Some(value) = arg.strip_prefix("--force-server=") {
            forced = Some(value.to_string());
        } else if arg == FORCE_SERVER_SWITCH {
            forced = args.next().map(|v| v.as_ref().to_string());
        }
    }

    if let Some(raw) = forced {
        match Url::parse(&raw) {
            Ok(url) => return url,
            Err(e) => log::warn!("[CONFIG] Ignoring invalid {} value {:?}: {}", FORCE_SERVER_SWITCH, raw, e),
        }
    }

    default_server_url()
}

pub fn default_server_url() -> Url {
    Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid")
}
