//! Browser wiring.
//!
//! [`BrowserHost`] implements [`ViewHost`] on top of the shell document, and
//! [`start`] installs the delegated click and popstate listeners before
//! loading the view named by the location hash.
//!
//! # Shell contract
//!
//! The host page provides `#view` (mount point), optionally `#footer-slot`,
//! and marks routed anchors with `data-route`.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlElement};

use crate::behaviors::PageBehaviors;
use crate::config::{
    DEFAULT_FOOTER_CLASS, FOOTER_SLOT_ID, MOUNT_ID, ROUTE_MARKER_ATTR, RouterConfig,
};
use crate::core::error::{BehaviorError, FetchError};
use crate::core::{LoadOptions, Router, SubtreeInit, ViewFooter, ViewHost};
use crate::models::AnchorLink;
use crate::utils::dom::{self, EventListener, HistoryState};
use crate::utils::fetch_fragment;

// ============================================================================
// BrowserHost
// ============================================================================

/// The live shell document.
pub struct BrowserHost {
    body: HtmlElement,
    mount: HtmlElement,
    footer_slot: Option<Element>,
}

impl BrowserHost {
    /// Bind to the current document; `None` without a body or mount point.
    pub fn from_document() -> Option<Self> {
        Some(Self {
            body: dom::body()?,
            mount: dom::html_element_by_id(MOUNT_ID)?,
            footer_slot: dom::document()?.get_element_by_id(FOOTER_SLOT_ID),
        })
    }
}

impl ViewHost for BrowserHost {
    type Node = Element;

    fn shell_url(&self) -> String {
        dom::shell_url()
    }

    fn location_hash(&self) -> String {
        dom::get_hash()
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        fetch_fragment(url).await
    }

    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }

    fn add_root_class(&self, class: &str) {
        let _ = self.body.class_list().add_1(class);
    }

    fn remove_root_class(&self, class: &str) {
        let _ = self.body.class_list().remove_1(class);
    }

    fn reflow(&self) {
        let _ = self.mount.offset_height();
    }

    fn replace_view(&self, html: &str) {
        self.mount.set_inner_html(html);
    }

    fn replace_footer(&self, footer: Option<&ViewFooter>) {
        let Some(slot) = &self.footer_slot else {
            return;
        };
        let class = footer
            .map(|f| f.class.as_str())
            .filter(|class| !class.is_empty())
            .unwrap_or(DEFAULT_FOOTER_CLASS);
        slot.set_class_name(class);
        slot.set_inner_html(footer.map(|f| f.inner_html.as_str()).unwrap_or_default());
    }

    fn push_history(&self, view: &str, url: &str) {
        let state = HistoryState {
            view: view.to_string(),
        };
        dom::push_state(&state, url);
    }

    fn mount_node(&self) -> Option<Element> {
        Some(self.mount.clone().into())
    }
}

// ============================================================================
// Event wiring
// ============================================================================

type AppRouter = Router<BrowserHost>;

fn clicked_anchor(event: &Event) -> Option<Element> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest("a").ok()?
}

fn navigate(router: &Rc<AppRouter>, view: String, options: LoadOptions) {
    let router = router.clone();
    spawn_local(async move {
        // Failures are logged inside load_view
        let _ = router.load_view(&view, options).await;
    });
}

fn on_click(router: &Rc<AppRouter>, event: &Event) {
    let Some(anchor) = clicked_anchor(event) else {
        return;
    };
    let link = AnchorLink::new(
        anchor.has_attribute(ROUTE_MARKER_ATTR),
        anchor.get_attribute("href").as_deref(),
    );
    if !link.is_internal_view(&dom::page_origin()) {
        return;
    }
    let Some(target) = link.view_target(&dom::shell_url()) else {
        return;
    };
    event.prevent_default();
    navigate(router, target, LoadOptions::default());
}

fn on_popstate(router: &Rc<AppRouter>, event: &Event) {
    let view = dom::history_state(event)
        .map(|state| state.view)
        .unwrap_or_else(|| router.resolve_current_view().to_string());
    navigate(router, view, LoadOptions::replay());
}

/// Wasm entry point: panic hook, console logger, router.
#[wasm_bindgen(start)]
pub fn boot() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);

    if let Err(e) = start() {
        log::error!(target: "router", "startup failed: {}", e);
    }
}

/// Wire the router into the current document and load the initial view.
pub fn start() -> Result<(), BehaviorError> {
    let document = dom::document().ok_or(BehaviorError::NoDocument)?;
    let window = dom::window().ok_or(BehaviorError::NoDocument)?;

    // Widgets already present in the shell, routed or not
    let behaviors = PageBehaviors::new();
    if let Some(body) = dom::body()
        && let Err(e) = behaviors.init_subtree(&body)
    {
        log::error!(target: "behaviors", "init failed: {}", e);
    }

    let Some(host) = BrowserHost::from_document() else {
        log::info!(target: "router", "no #{} element, router disabled", MOUNT_ID);
        // Standalone page: its widgets live as long as the page
        std::mem::forget(behaviors);
        return Ok(());
    };

    let router = Rc::new(Router::new(host, RouterConfig::default()).with_behaviors(behaviors));

    let click_router = router.clone();
    EventListener::new(&document, "click", false, move |event| {
        on_click(&click_router, &event)
    })?
    .forget();

    let pop_router = router.clone();
    EventListener::new(&window, "popstate", true, move |event| {
        on_popstate(&pop_router, &event)
    })?
    .forget();

    let initial = router.resolve_current_view().to_string();
    log::info!(target: "router", "booting at {}", initial);
    navigate(&router, initial, LoadOptions::replay());
    Ok(())
}
