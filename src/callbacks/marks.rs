//! Mark list and comment dialog callbacks.
//!
//! Handles: mark_row_clicked, dialog_submit, dialog_cancel, dialog_delete

use slint::ComponentHandle;

use super::{apply_effects, AppCtx};
use crate::session::SessionEvent;
use crate::AppWindow;

/// Sets up sidebar and dialog callbacks on the UI.
pub fn setup_mark_callbacks(ui: &AppWindow, ctx: &AppCtx) {
    setup_row_clicked(ui, ctx.clone());
    setup_dialog_submit(ui, ctx.clone());
    setup_dialog_cancel(ui, ctx.clone());
    setup_dialog_delete(ui, ctx.clone());
}

fn setup_row_clicked(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_mark_row_clicked(move |index| {
        let id = {
            let store = ctx.store.borrow();
            store.get_by_index(index as usize).map(|m| m.id)
        };
        let Some(id) = id else { return };
        let effects = ctx.session.borrow_mut().handle(SessionEvent::MarkClicked(id));
        if let Some(ui) = ui_weak.upgrade() {
            apply_effects(&ui, &ctx, effects);
        }
    });
}

fn setup_dialog_submit(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_dialog_submit(move |comment| {
        let text = comment.to_string();
        // The dialog disables submission for empty text; the session
        // rejects it as well.
        let effects = ctx
            .session
            .borrow_mut()
            .handle(SessionEvent::SubmitComment(text));
        if let Some(ui) = ui_weak.upgrade() {
            apply_effects(&ui, &ctx, effects);
        }
    });
}

fn setup_dialog_cancel(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_dialog_cancel(move || {
        let effects = ctx
            .session
            .borrow_mut()
            .handle(SessionEvent::DialogDismissed);
        if let Some(ui) = ui_weak.upgrade() {
            apply_effects(&ui, &ctx, effects);
        }
    });
}

fn setup_dialog_delete(ui: &AppWindow, ctx: AppCtx) {
    let ui_weak = ui.as_weak();
    ui.on_dialog_delete(move || {
        let effects = ctx
            .session
            .borrow_mut()
            .handle(SessionEvent::DeleteRequested);
        if let Some(ui) = ui_weak.upgrade() {
            apply_effects(&ui, &ctx, effects);
        }
    });
}
