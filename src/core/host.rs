//! The seam between the navigation routine and the browser.
//!
//! [`ViewHost`] owns every side effect the router performs: the fragment
//! request, the transition delays, the body classes, the mount point and the
//! footer slot, and the history stack. The browser implementation lives in
//! `app`; tests drive the router with an in-memory host.

use std::future::Future;

use crate::core::error::{BehaviorError, FetchError};
use crate::core::fragment::ViewFooter;

/// Side effects available to the router.
pub trait ViewHost {
    /// Handle to the mounted subtree, passed to the page behaviors.
    type Node;

    /// Current page URL, without its fragment.
    fn shell_url(&self) -> String;

    /// Current location hash, including its leading `#` (may be empty).
    fn location_hash(&self) -> String;

    /// GET `url` as text, bypassing the HTTP cache.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;

    /// Suspend for `ms` milliseconds.
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;

    fn add_root_class(&self, class: &str);

    fn remove_root_class(&self, class: &str);

    /// Force a synchronous layout so class changes start a CSS transition.
    fn reflow(&self);

    /// Replace the mount point's contents with `html`.
    fn replace_view(&self, html: &str);

    /// Replace the footer slot's contents and class.
    fn replace_footer(&self, footer: Option<&ViewFooter>);

    /// Push a history entry for `url`, tagged with the view path.
    fn push_history(&self, view: &str, url: &str);

    /// The mount point, once it holds the new view.
    fn mount_node(&self) -> Option<Self::Node>;
}

/// Per-view initialization run after each swap.
///
/// Implementations must be idempotent and confine themselves to the subtree
/// they are handed (plus the shell chrome they own).
pub trait SubtreeInit<N> {
    fn init_subtree(&self, root: &N) -> Result<(), BehaviorError>;
}
