//! Navigation callbacks for gallery traversal.
//!
//! Handles: prev_image, next_image

use std::cell::RefCell;
use std::rc::Rc;

use slint::ComponentHandle;

use crate::gallery::Gallery;
use crate::AppWindow;

/// Type alias for the image loader closure
pub type ImageLoader = Rc<dyn Fn(usize)>;

/// Sets up gallery navigation callbacks on the UI. Navigation is ignored
/// while the comment dialog is open so the dialog cannot outlive its image.
pub fn setup_navigation_callbacks(
    ui: &AppWindow,
    loader: ImageLoader,
    gallery: Rc<RefCell<Option<Gallery>>>,
) {
    setup_next_image(ui, loader.clone(), gallery.clone());
    setup_prev_image(ui, loader, gallery);
}

fn setup_next_image(
    ui: &AppWindow,
    loader: ImageLoader,
    gallery: Rc<RefCell<Option<Gallery>>>,
) {
    let ui_weak = ui.as_weak();
    ui.on_next_image(move || {
        if ui_weak.upgrade().is_some_and(|ui| ui.get_dialog_visible()) {
            return;
        }
        // Drop the borrow before calling the loader (which borrows again).
        let next_idx = {
            let gallery_ref = gallery.borrow();
            let Some(g) = gallery_ref.as_ref() else { return };
            g.next_index()
        };
        loader(next_idx);
    });
}

fn setup_prev_image(
    ui: &AppWindow,
    loader: ImageLoader,
    gallery: Rc<RefCell<Option<Gallery>>>,
) {
    let ui_weak = ui.as_weak();
    ui.on_prev_image(move || {
        if ui_weak.upgrade().is_some_and(|ui| ui.get_dialog_visible()) {
            return;
        }
        let prev_idx = {
            let gallery_ref = gallery.borrow();
            let Some(g) = gallery_ref.as_ref() else { return };
            g.prev_index()
        };
        loader(prev_idx);
    });
}
