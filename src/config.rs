//! Application configuration.
//!
//! Centralizes the constants shared by the router and the page behaviors.
//! [`RouterConfig`] bundles the router-facing ones so the navigation routine
//! can be exercised with other values in tests.

// =============================================================================
// Fragment Layout
// =============================================================================

/// Directory (relative to the shell URL) holding the view fragments.
pub const VIEW_DIR: &str = "views/";

/// Fragment loaded when the location carries no view.
pub const DEFAULT_VIEW: &str = "views/index.html";

/// Extension a link target must carry to be routed.
pub const VIEW_EXTENSION: &str = ".html";

// =============================================================================
// DOM Contract
// =============================================================================

/// Tag of the element marking a fragment's view root.
pub const VIEW_ROOT_TAG: &str = "main";

/// Attribute marking a fragment's view root (`main[data-view]`).
pub const VIEW_ROOT_ATTR: &str = "data-view";

/// Attribute marking view-specific footer content inside a fragment.
pub const FOOTER_MARKER_ATTR: &str = "data-view-footer";

/// Attribute opting an anchor into router interception.
pub const ROUTE_MARKER_ATTR: &str = "data-route";

/// Id of the shell element that receives the view content.
pub const MOUNT_ID: &str = "view";

/// Id of the shell element that receives the view footer markup.
pub const FOOTER_SLOT_ID: &str = "footer-slot";

/// Class restored on the footer slot when a view brings no footer class.
pub const DEFAULT_FOOTER_CLASS: &str = "footer";

/// Body elements dropped when a fragment has no view root.
pub const STRIPPED_TAGS: &[&str] = &["header", "nav", "script", "style"];

// =============================================================================
// Transition Configuration
// =============================================================================

/// CSS classes toggled on the document body during a view swap.
pub mod transition_classes {
    /// Outbound fade.
    pub const LEAVING: &str = "animate-out";
    /// Inbound start state, applied for a single layout pass.
    pub const PRE_ENTERING: &str = "pre-in";
    /// Inbound fade.
    pub const ENTERING: &str = "animate-in";
}

/// Time given to the outbound CSS transition (milliseconds).
pub const LEAVE_DELAY_MS: u32 = 180;

/// Time before the inbound class is cleared (milliseconds).
pub const ENTER_DELAY_MS: u32 = 240;

// =============================================================================
// Network Configuration
// =============================================================================

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

// =============================================================================
// Page Behaviors
// =============================================================================

/// Selectors and ids used by the sortable index tables.
pub mod sorter {
    pub const TABLE_BODY: &str = ".table-body";
    pub const TABLE: &str = ".index-table";
    pub const TABLE_HEAD: &str = ".table-head";
    pub const BUTTON: &str = ".sorter";
    pub const ROW: &str = ".row";
    pub const ASC_CLASS: &str = "asc";
    pub const DESC_CLASS: &str = "desc";
}

/// Element ids and attributes used by the project gallery.
pub mod gallery {
    pub const TRACK_ID: &str = "track";
    pub const TITLE_ID: &str = "projectTitle";
    pub const YEAR_ID: &str = "projectYear";
    pub const MENU_ID: &str = "projectMenu";
    pub const ITEM: &str = ".figure[data-project]";
    pub const PROJECT_ATTR: &str = "data-project";
    pub const YEAR_ATTR: &str = "data-year";
    pub const MENU_ITEM_CLASS: &str = "project-menu-item";
    pub const ACTIVE_CLASS: &str = "is-active";
    pub const LETTRINE_CLASS: &str = "lettrine";
}

/// Data attribute set on controls that already carry their listeners.
pub const BOUND_ATTR: &str = "data-bound";

// =============================================================================
// RouterConfig
// =============================================================================

/// Router parameters, defaulting to the constants above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub view_dir: String,
    pub default_view: String,
    pub leave_delay_ms: u32,
    pub enter_delay_ms: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            view_dir: VIEW_DIR.to_string(),
            default_view: DEFAULT_VIEW.to_string(),
            leave_delay_ms: LEAVE_DELAY_MS,
            enter_delay_ms: ENTER_DELAY_MS,
        }
    }
}
