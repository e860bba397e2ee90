//! Hash-based view paths.
//!
//! URL format: `#/views/<name>.html`. The hash names the fragment file,
//! relative to the shell URL, that fills the mount point.

use std::fmt;

use url::Url;

use crate::config::{DEFAULT_VIEW, VIEW_DIR};

/// Normalized relative path of a view fragment (e.g. `views/about.html`).
///
/// Always non-empty and always rooted under the fragment directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewPath(String);

impl ViewPath {
    /// Normalize a raw link target or location hash with the default
    /// fragment directory and home view.
    pub fn normalize(raw: Option<&str>) -> Self {
        Self::normalize_in(raw, VIEW_DIR, DEFAULT_VIEW)
    }

    /// Normalize a raw link target or location hash.
    ///
    /// Strips a leading `#` and up to two `/`, falls back to `default_view`
    /// when nothing is left, and prefixes `view_dir` unless already present.
    pub fn normalize_in(raw: Option<&str>, view_dir: &str, default_view: &str) -> Self {
        let raw = raw.unwrap_or_default();
        let path = raw.strip_prefix('#').unwrap_or(raw);
        let path = path.strip_prefix('/').unwrap_or(path);
        let path = path.strip_prefix('/').unwrap_or(path);

        if path.is_empty() {
            return Self(default_view.to_string());
        }
        if path.starts_with(view_dir) {
            return Self(path.to_string());
        }
        Self(format!("{}{}", view_dir, path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without its `.html` suffix, `view` when empty.
    pub fn stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or_default();
        let stem = match name.len().checked_sub(5) {
            Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".html") => {
                &name[..cut]
            }
            _ => name,
        };
        if stem.is_empty() { "view" } else { stem }
    }

    /// Convert to URL hash.
    pub fn to_hash(&self) -> String {
        format!("#/{}", self.0)
    }

    /// Absolute URL of the fragment file, resolved against the shell URL.
    pub fn fragment_url(&self, shell_url: &str) -> Option<String> {
        let base = Url::parse(strip_fragment(shell_url)).ok()?;
        base.join(&self.0).ok().map(String::from)
    }

    /// Shell URL with this view appended as the location hash.
    pub fn history_url(&self, shell_url: &str) -> String {
        format!("{}{}", strip_fragment(shell_url), self.to_hash())
    }
}

impl fmt::Display for ViewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drop everything from the first `#`.
pub fn strip_fragment(url: &str) -> &str {
    url.split('#').next().unwrap_or(url)
}
