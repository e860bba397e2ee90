//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::core::error::BehaviorError;

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the current document.
#[inline]
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Get the document body.
#[inline]
pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

/// Get an element by id, as an `HtmlElement`.
pub fn html_element_by_id(id: &str) -> Option<HtmlElement> {
    document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Viewport width in CSS pixels.
pub fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

// =============================================================================
// Browser Navigation
// =============================================================================

/// State object stored with each history entry the router pushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub view: String,
}

/// Get the current URL hash (with its '#' prefix, empty when absent).
pub fn get_hash() -> String {
    window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Current page URL without its fragment.
pub fn shell_url() -> String {
    window()
        .and_then(|w| w.location().href().ok())
        .map(|href| crate::models::strip_fragment(&href).to_string())
        .unwrap_or_default()
}

/// Origin of the current page (`scheme://host[:port]`).
pub fn page_origin() -> String {
    window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Push a history entry carrying `state`.
pub fn push_state(state: &HistoryState, url: &str) {
    let Some(window) = window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let value = serde_wasm_bindgen::to_value(state).unwrap_or(wasm_bindgen::JsValue::NULL);
    if let Err(e) = history.push_state_with_url(&value, "", Some(url)) {
        log::warn!(target: "router", "pushState rejected: {:?}", e);
    }
}

/// Read the router state back from a popstate event.
pub fn history_state(event: &Event) -> Option<HistoryState> {
    let event = event.dyn_ref::<web_sys::PopStateEvent>()?;
    serde_wasm_bindgen::from_value(event.state()).ok()
}

// =============================================================================
// Events
// =============================================================================

/// A DOM event listener, removed from its target when dropped.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: F,
    ) -> Result<Self, BehaviorError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Keep the listener for the lifetime of the page.
    pub fn forget(self) {
        std::mem::forget(self);
    }

    /// Whether the target is still in the document. Windows and documents
    /// always are.
    pub fn is_connected(&self) -> bool {
        self.target
            .dyn_ref::<web_sys::Node>()
            .is_none_or(|node| node.is_connected())
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Run `f` before the next repaint.
pub fn next_frame(f: impl FnOnce() + 'static) {
    let Some(window) = window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    let _ = window.request_animation_frame(callback.unchecked_ref());
}

/// Whether an element already carries its listeners.
pub fn is_bound(element: &Element) -> bool {
    element.get_attribute(crate::config::BOUND_ATTR).as_deref() == Some("1")
}

/// Mark an element as carrying its listeners.
pub fn mark_bound(element: &Element) {
    let _ = element.set_attribute(crate::config::BOUND_ATTR, "1");
}
