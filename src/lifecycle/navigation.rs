//! Navigation containment for the hosted content.
//!
//! The main webview may only navigate within the trusted origin. Link opens
//! (`window.open`, `target="_blank"`) never open inside the shell: safe
//! schemes go to the OS handler, everything else is dropped.

use url::{Origin, Url};

/// Schemes that may be handed to the OS opener.
const EXTERNAL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// What to do with a link-open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// Deny in-window and pass the URL to the OS handler.
    OpenExternally(Url),
    /// Deny and drop.
    Deny,
}

pub struct NavigationGuard {
    trusted_origin: Origin,
}

impl NavigationGuard {
    pub fn new(trusted: &Url) -> Self {
        Self {
            trusted_origin: trusted.origin(),
        }
    }

    /// Whether the top-level window may navigate to `target`.
    pub fn allows_navigation(&self, target: &Url) -> bool {
        let allowed = target.origin() == self.trusted_origin;
        if !allowed {
            log::debug!("[NAV] Blocked navigation to {}", target);
        }
        allowed
    }

    /// Classify a link-open request.
    pub fn link_open(&self, raw: &str) -> LinkDecision {
        match Url::parse(raw) {
            Ok(url) if EXTERNAL_SCHEMES.contains(&url.scheme()) => LinkDecision::OpenExternally(url),
            Ok(url) => {
                log::debug!("[NAV] Denied link open with scheme {:?}", url.scheme());
                LinkDecision::Deny
            },
            Err(e) => {
                log::debug!("[NAV] Denied unparseable link {:?}: {}", raw, e);
                LinkDecision::Deny
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> NavigationGuard {
        NavigationGuard::new(&Url::parse("https://mutinyapp.gg").unwrap())
    }

    #[test]
    fn test_same_origin_navigation_allowed() {
        let target = Url::parse("https://mutinyapp.gg/channels/123?x=1").unwrap();
        assert!(guard().allows_navigation(&target));
    }

    #[test]
    fn test_off_origin_navigation_blocked() {
        for raw in [
            "https://evil.example/",
            "http://mutinyapp.gg/",
            "https://mutinyapp.gg:8443/",
            "https://sub.mutinyapp.gg/",
            "file:///etc/passwd",
        ] {
            let target = Url::parse(raw).unwrap();
            assert!(!guard().allows_navigation(&target), "{}", raw);
        }
    }

    #[test]
    fn test_https_link_opens_externally() {
        let decision = guard().link_open("https://github.com/mutiny");
        assert_eq!(
            decision,
            LinkDecision::OpenExternally(Url::parse("https://github.com/mutiny").unwrap())
        );
    }

    #[test]
    fn test_mailto_and_http_open_externally() {
        assert!(matches!(
            guard().link_open("mailto:hello@mutinyapp.gg"),
            LinkDecision::OpenExternally(_)
        ));
        assert!(matches!(
            guard().link_open("http://example.com"),
            LinkDecision::OpenExternally(_)
        ));
    }

    #[test]
    fn test_unknown_schemes_denied() {
        for raw in ["javascript:alert(1)", "file:///tmp/x", "steam://run/1", "not a url"] {
            assert_eq!(guard().link_open(raw), LinkDecision::Deny, "{}", raw);
        }
    }
}
