//! Per-view interactive widgets.
//!
//! - [`sorter`] - Column sorting for index tables
//! - [`gallery`] - Project gallery with a centered-item title and menu

pub mod gallery;
pub mod sorter;

use std::cell::RefCell;

use web_sys::Element;

use crate::core::SubtreeInit;
use crate::core::error::BehaviorError;
use crate::utils::dom::EventListener;
use gallery::GalleryBinding;

/// Page behaviors handed to the router.
///
/// Owns every listener it installs. Bindings whose elements have left the
/// document are released on the next [`SubtreeInit::init_subtree`].
#[derive(Default)]
pub struct PageBehaviors {
    sorters: RefCell<Vec<EventListener>>,
    gallery: RefCell<Option<GalleryBinding>>,
}

impl PageBehaviors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sort buttons currently bound.
    pub fn sorter_count(&self) -> usize {
        self.sorters.borrow().len()
    }

    /// Whether a gallery is currently bound.
    pub fn has_gallery(&self) -> bool {
        self.gallery.borrow().is_some()
    }

    fn release_detached(&self) {
        self.sorters.borrow_mut().retain(EventListener::is_connected);
        let mut gallery = self.gallery.borrow_mut();
        if gallery.as_ref().is_some_and(|binding| !binding.is_connected()) {
            *gallery = None;
        }
    }
}

impl SubtreeInit<Element> for PageBehaviors {
    fn init_subtree(&self, root: &Element) -> Result<(), BehaviorError> {
        self.release_detached();

        let sorters = sorter::init_sorters(root)?;
        let new_sorters = sorters.len();
        self.sorters.borrow_mut().extend(sorters);

        let gallery = gallery::init_gallery()?;
        let gallery_bound = gallery.is_some();
        if gallery.is_some() {
            *self.gallery.borrow_mut() = gallery;
        }

        log::debug!(
            target: "behaviors",
            "bound {} sort buttons ({} live), new gallery: {}",
            new_sorters,
            self.sorter_count(),
            gallery_bound
        );
        Ok(())
    }
}
