//! Horizontally scrolling project gallery.
//!
//! The project title, year and menu follow whichever gallery item sits
//! closest to the horizontal center of the viewport. The menu lists each
//! project once and scrolls the gallery to it on click.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, WheelEvent,
};

use crate::behaviors::sorter::elements;
use crate::config::gallery::{
    ACTIVE_CLASS, ITEM, LETTRINE_CLASS, MENU_ID, MENU_ITEM_CLASS, PROJECT_ATTR, TITLE_ID,
    TRACK_ID, YEAR_ATTR, YEAR_ID,
};
use crate::core::error::BehaviorError;
use crate::utils::dom::{self, EventListener, is_bound, mark_bound};

/// Horizontal extent of a gallery item, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBox {
    pub left: f64,
    pub width: f64,
}

impl ItemBox {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Index of the item whose center is closest to the viewport center.
///
/// Ties go to the first item encountered.
pub fn centered_index(items: &[ItemBox], viewport_width: f64) -> Option<usize> {
    let center = viewport_width / 2.0;
    let mut best: Option<(usize, f64)> = None;
    for (index, item) in items.iter().enumerate() {
        let distance = (item.center() - center).abs();
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

/// Distinct non-empty project names, in first-seen order.
pub fn unique_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut unique: Vec<String> = Vec::new();
    for name in names.into_iter().flatten() {
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

/// Split trimmed text into its first character and the rest.
pub fn split_lettrine(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let first = text.chars().next()?;
    Some((first.to_string(), text[first.len_utf8()..].to_string()))
}

/// Horizontal scroll for a wheel delta, carrying the sub-pixel remainder.
///
/// Returns the whole pixels to scroll now and the remainder to carry into
/// the next event.
pub fn wheel_step(carry: f64, delta: f64) -> (i32, f64) {
    let total = carry + delta;
    let whole = total.trunc();
    (whole as i32, total - whole)
}

/// Project currently centered in the gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Focus {
    pub name: String,
    pub year: String,
}

fn lettrine(text: &str) -> impl IntoView + use<> {
    split_lettrine(text).map(|(first, rest)| {
        view! {
            <span class=LETTRINE_CLASS>{first}</span>
            {rest}
        }
    })
}

// =============================================================================
// DOM binding
// =============================================================================

/// Listeners and views owned by one initialized gallery.
///
/// Dropping it removes the listeners, unmounts the menu, title and year
/// views, and disposes the reactive state they share.
pub struct GalleryBinding {
    menu: HtmlElement,
    _listeners: Vec<EventListener>,
    _views: Vec<Box<dyn Any>>,
    _owner: Owner,
}

impl GalleryBinding {
    /// Whether the gallery's menu is still in the document.
    pub fn is_connected(&self) -> bool {
        self.menu.is_connected()
    }
}

fn gallery_items() -> Vec<Element> {
    dom::document()
        .and_then(|doc| doc.get_element_by_id(TRACK_ID))
        .and_then(|track| track.query_selector_all(ITEM).ok())
        .map(elements)
        .unwrap_or_default()
}

fn scroll_to_project(name: &str) {
    let target = gallery_items()
        .into_iter()
        .find(|item| item.get_attribute(PROJECT_ATTR).as_deref() == Some(name));
    let Some(target) = target else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_inline(ScrollLogicalPosition::Center);
    options.set_block(ScrollLogicalPosition::Nearest);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

fn measure_focus(items: &[Element]) -> Option<Focus> {
    let boxes: Vec<ItemBox> = items
        .iter()
        .map(|item| {
            let rect = item.get_bounding_client_rect();
            ItemBox {
                left: rect.left(),
                width: rect.width(),
            }
        })
        .collect();
    let best = &items[centered_index(&boxes, dom::viewport_width())?];
    Some(Focus {
        name: best.get_attribute(PROJECT_ATTR).unwrap_or_default(),
        year: best.get_attribute(YEAR_ATTR).unwrap_or_default(),
    })
}

/// Initialize the gallery, if the current page has one.
///
/// The title and menu usually live in the footer slot while the track lives
/// in the view, so they are looked up document-wide. Returns `None` when the
/// page has no gallery or its menu is already bound. The menu is marked
/// bound only once every listener is in place.
pub fn init_gallery() -> Result<Option<GalleryBinding>, BehaviorError> {
    let (Some(title), Some(menu), Some(track)) = (
        dom::html_element_by_id(TITLE_ID),
        dom::html_element_by_id(MENU_ID),
        dom::html_element_by_id(TRACK_ID),
    ) else {
        return Ok(None);
    };
    if is_bound(&menu) {
        return Ok(None);
    }

    let items = elements(track.query_selector_all(ITEM)?);
    let names = unique_names(items.iter().map(|item| item.get_attribute(PROJECT_ATTR)));

    let owner = Owner::new();
    let focus = owner.with(|| RwSignal::new(measure_focus(&items)));

    let update: Rc<dyn Fn()> = Rc::new(move || {
        if let Some(next) = measure_focus(&items) {
            focus.set(Some(next));
        }
    });

    let mut listeners = Vec::with_capacity(3);

    // One recompute per animation frame while scrolling
    let pending = Rc::new(Cell::new(false));
    let on_scroll = update.clone();
    listeners.push(EventListener::new(&track, "scroll", true, move |_| {
        if pending.replace(true) {
            return;
        }
        let pending = pending.clone();
        let update = on_scroll.clone();
        dom::next_frame(move || {
            pending.set(false);
            update();
        });
    })?);

    if let Some(window) = dom::window() {
        let on_resize = update.clone();
        listeners.push(EventListener::new(&window, "resize", true, move |_| on_resize())?);
    }

    let wheel_target = menu.clone();
    let mut carry = 0.0;
    listeners.push(EventListener::new(&menu, "wheel", false, move |event| {
        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        if wheel.delta_y().abs() > wheel.delta_x().abs() {
            let (step, rest) = wheel_step(carry, wheel.delta_y());
            carry = rest;
            wheel_target.set_scroll_left(wheel_target.scroll_left() + step);
            event.prevent_default();
        }
    })?);

    let mut views: Vec<Box<dyn Any>> = Vec::with_capacity(3);
    owner.with(|| {
        menu.set_inner_html("");
        views.push(Box::new(mount_to(menu.clone(), move || {
            names
                .into_iter()
                .map(|name| {
                    let label = lettrine(&name);
                    let active_name = name.clone();
                    let class = move || {
                        let active =
                            focus.with(|f| f.as_ref().is_some_and(|f| f.name == active_name));
                        if active {
                            format!("{} {}", MENU_ITEM_CLASS, ACTIVE_CLASS)
                        } else {
                            MENU_ITEM_CLASS.to_string()
                        }
                    };
                    view! {
                        <button type="button" class=class on:click=move |_| scroll_to_project(&name)>
                            {label}
                        </button>
                    }
                })
                .collect_view()
        })));

        title.set_inner_html("");
        views.push(Box::new(mount_to(title, move || {
            view! { {move || focus.get().map(|f| lettrine(&f.name))} }
        })));

        if let Some(year) = dom::html_element_by_id(YEAR_ID) {
            year.set_inner_html("");
            views.push(Box::new(mount_to(year, move || {
                view! { {move || focus.get().map(|f| f.year)} }
            })));
        }
    });

    mark_bound(&menu);

    Ok(Some(GalleryBinding {
        menu,
        _listeners: listeners,
        _views: views,
        _owner: owner,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(lefts: &[f64], width: f64) -> Vec<ItemBox> {
        lefts.iter().map(|&left| ItemBox { left, width }).collect()
    }

    #[test]
    fn test_centered_index_picks_closest() {
        // Viewport center at 500; centers at 150, 450, 750
        let items = boxes(&[100.0, 400.0, 700.0], 100.0);
        assert_eq!(centered_index(&items, 1000.0), Some(1));
        assert_eq!(centered_index(&items, 1500.0), Some(2));
        assert_eq!(centered_index(&items, 100.0), Some(0));
    }

    #[test]
    fn test_centered_index_tie_goes_to_first() {
        // Centers at 400 and 600, both 100 from the viewport center
        let items = boxes(&[350.0, 550.0, 900.0], 100.0);
        assert_eq!(centered_index(&items, 1000.0), Some(0));
    }

    #[test]
    fn test_centered_index_empty() {
        assert_eq!(centered_index(&[], 1000.0), None);
    }

    #[test]
    fn test_unique_names() {
        let names = vec![
            Some("Atlas".to_string()),
            None,
            Some("Bruma".to_string()),
            Some("Atlas".to_string()),
            Some(String::new()),
            Some("Céleste".to_string()),
        ];
        assert_eq!(unique_names(names), vec!["Atlas", "Bruma", "Céleste"]);
    }

    #[test]
    fn test_wheel_step_carries_fraction() {
        assert_eq!(wheel_step(0.0, 40.0), (40, 0.0));
        assert_eq!(wheel_step(0.0, -3.0), (-3, 0.0));

        // Trackpad deltas below one pixel add up instead of vanishing
        let mut carry = 0.0;
        let mut scrolled = 0;
        for _ in 0..4 {
            let (step, rest) = wheel_step(carry, 0.5);
            scrolled += step;
            carry = rest;
        }
        assert_eq!(scrolled, 2);
        assert_eq!(carry, 0.0);
    }

    #[test]
    fn test_split_lettrine() {
        assert_eq!(
            split_lettrine("  Éole "),
            Some(("É".to_string(), "ole".to_string()))
        );
        assert_eq!(split_lettrine("A"), Some(("A".to_string(), String::new())));
        assert_eq!(split_lettrine("   "), None);
    }
}
