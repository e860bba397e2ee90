//! Classification of clicked anchors.

use url::Url;

use crate::config::VIEW_EXTENSION;
use super::strip_fragment;

/// The attributes of a clicked `<a>` the router cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorLink {
    /// Whether the anchor carries the route marker attribute.
    pub routed: bool,
    /// Raw `href` attribute, as written in the markup.
    pub href: Option<String>,
}

impl AnchorLink {
    pub fn new(routed: bool, href: Option<&str>) -> Self {
        Self {
            routed,
            href: href.map(String::from),
        }
    }

    /// Whether the router should intercept this link instead of letting the
    /// browser navigate.
    ///
    /// Requires the route marker, a non-empty target that is not an in-page
    /// fragment, `mailto:` or `tel:`, the page origin for absolute HTTP(S)
    /// targets, and the `.html` suffix.
    pub fn is_internal_view(&self, page_origin: &str) -> bool {
        if !self.routed {
            return false;
        }
        let Some(href) = self.href.as_deref().filter(|h| !h.is_empty()) else {
            return false;
        };

        if href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("tel:") {
            return false;
        }

        if is_http_url(href) {
            let Ok(url) = Url::parse(href) else {
                return false;
            };
            if url.origin().ascii_serialization() != page_origin {
                return false;
            }
        }

        href.ends_with(VIEW_EXTENSION)
    }

    /// Link target to hand to the router.
    ///
    /// Absolute HTTP(S) targets are rewritten relative to the shell URL so
    /// they normalize like the relative form. Other targets pass through.
    pub fn view_target(&self, shell_url: &str) -> Option<String> {
        let href = self.href.as_deref()?;
        if !is_http_url(href) {
            return Some(href.to_string());
        }
        let base = Url::parse(strip_fragment(shell_url)).ok()?;
        let target = Url::parse(href).ok()?;
        base.make_relative(&target)
    }
}

fn is_http_url(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
