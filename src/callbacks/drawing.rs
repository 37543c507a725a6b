//! Drawing callbacks: canvas pointer events plus the marking-mode toggle
//! and tool pickers.
//!
//! Pointer positions arrive in canvas-local display pixels together with
//! the element's current display size; they are mapped to image-intrinsic
//! coordinates per event before entering the session state machine.

use slint::ComponentHandle;

use super::{apply_effects, AppCtx};
use crate::geometry::{self, DisplaySize, ImagePoint};
use crate::mark::{MarkColor, MarkKind};
use crate::session::{SessionEvent, SessionState};
use crate::AppWindow;

/// Sets up canvas pointer callbacks and the drawing toolbar.
pub fn setup_drawing_callbacks(ui: &AppWindow, ctx: &AppCtx) {
    setup_canvas_pressed(ui, ctx.clone());
    setup_canvas_moved(ui, ctx.clone());
    setup_canvas_released(ui, ctx.clone());
    setup_toggle_marking(ui, ctx.clone());
    setup_tool_pickers(ui, ctx.clone());
}

/// Pointer position mapped to intrinsic coordinates, or `None` while no
/// image is loaded (drawing is gated on image-load completion).
fn map_pointer(ctx: &AppCtx, x: f32, y: f32, w: f32, h: f32) -> Option<ImagePoint> {
    let loaded = ctx.loaded.borrow();
    let image = loaded.as_ref()?;
    Some(geometry::map_to_image(
        x,
        y,
        DisplaySize {
            width: w,
            height: h,
        },
        image.dimensions(),
    ))
}

fn setup_canvas_pressed(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_canvas_pressed(move |x, y, w, h| {
        let Some(p) = map_pointer(&ctx, x, y, w, h) else {
            return;
        };
        let effects = ctx.session.borrow_mut().handle(SessionEvent::PointerDown(p));
        if let Some(ui) = ui_weak.upgrade() {
            apply_effects(&ui, &ctx, effects);
        }
    });
}

fn setup_canvas_moved(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_canvas_moved(move |x, y, w, h| {
        let Some(p) = map_pointer(&ctx, x, y, w, h) else {
            return;
        };
        // Cheap when not dragging: the session ignores hover moves.
        let effects = ctx.session.borrow_mut().handle(SessionEvent::PointerMove(p));
        if let Some(ui) = ui_weak.upgrade() {
            apply_effects(&ui, &ctx, effects);
        }
    });
}

fn setup_canvas_released(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_canvas_released(move |x, y, w, h| {
        let Some(p) = map_pointer(&ctx, x, y, w, h) else {
            return;
        };
        // Outside marking mode a release is a click: resolve it against
        // existing marks via the hit tester.
        let event = {
            let session = ctx.session.borrow();
            if matches!(session.state(), SessionState::Idle) {
                let store = ctx.store.borrow();
                geometry::hit_test_marks(store.as_slice(), p)
                    .map(|mark| SessionEvent::MarkClicked(mark.id))
            } else {
                Some(SessionEvent::PointerUp(p))
            }
        };
        let Some(event) = event else { return };
        let effects = ctx.session.borrow_mut().handle(event);
        if let Some(ui) = ui_weak.upgrade() {
            apply_effects(&ui, &ctx, effects);
        }
    });
}

fn setup_toggle_marking(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_toggle_marking(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let enable = !ui.get_marking_mode();
        let effects = ctx
            .session
            .borrow_mut()
            .handle(SessionEvent::SetMarking(enable));
        apply_effects(&ui, &ctx, effects);
        ui.set_marking_mode(ctx.session.borrow().is_marking());
    });
}

fn setup_tool_pickers(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    let shape_ctx = ctx.clone();
    ui.on_shape_selected(move |name| {
        if let Some(kind) = MarkKind::parse(name.as_str()) {
            shape_ctx.session.borrow_mut().tool = kind;
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_current_shape(kind.name().into());
            }
        }
    });

    let ui_weak = ui.as_weak();
    ui.on_color_selected(move |name| {
        if let Some(color) = MarkColor::parse(name.as_str()) {
            ctx.session.borrow_mut().color = color;
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_current_color(color.name().into());
            }
        }
    });
}
