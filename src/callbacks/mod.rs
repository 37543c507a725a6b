//! UI callback handlers, organized by functionality:
//! - `drawing` - canvas pointer events, marking-mode and tool toolbar
//! - `marks` - mark list rows and the comment dialog
//! - `navigation` - gallery traversal (prev/next)
//!
//! All handlers funnel user input through the drawing session's state
//! machine and apply the returned effects here, so the UI layer contains
//! no transition logic of its own.

pub mod drawing;
pub mod marks;
pub mod navigation;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::mark::{MarkColor, MarkShape, NewMark};
use crate::repository::MarkRepository;
use crate::session::{Session, SessionEffect, SessionEvent};
use crate::state::{LoadedImage, MarkStore};
use crate::AppWindow;

/// Shared handles every callback group needs.
#[derive(Clone)]
pub struct AppCtx {
    pub session: Rc<RefCell<Session>>,
    pub store: Rc<RefCell<MarkStore>>,
    pub loaded: Rc<RefCell<Option<LoadedImage>>>,
    pub repository: Rc<dyn MarkRepository>,
    pub author: Rc<String>,
    /// Recomposite the canvas, optionally with a live preview shape.
    pub redraw: Rc<dyn Fn(Option<(MarkShape, MarkColor)>)>,
    /// Rebuild the sidebar rows from the mark store.
    pub refresh_rows: Rc<dyn Fn()>,
}

/// Apply session effects in order. Repository mutations run here; the
/// local mark set is only touched after the repository call succeeds, and
/// failures surface on the status line without crashing the render loop.
pub fn apply_effects(ui: &AppWindow, ctx: &AppCtx, effects: Vec<SessionEffect>) {
    for effect in effects {
        match effect {
            SessionEffect::ShowPreview { shape, color } => {
                (ctx.redraw)(Some((shape, color)));
            }
            SessionEffect::HidePreview => {
                (ctx.redraw)(None);
            }
            SessionEffect::OpenDialog { existing } => {
                match existing {
                    Some(id) => {
                        let store = ctx.store.borrow();
                        let Some(mark) = store.get(id) else {
                            drop(store);
                            // The mark vanished under us (e.g. external
                            // delete); reset the session instead of opening
                            // an empty dialog.
                            let fx = ctx
                                .session
                                .borrow_mut()
                                .handle(SessionEvent::DialogDismissed);
                            apply_effects(ui, ctx, fx);
                            ui.set_status_text("Mark no longer exists".into());
                            continue;
                        };
                        ui.set_dialog_existing(true);
                        ui.set_dialog_author(mark.author.clone().into());
                        ui.set_dialog_comment(mark.comment.clone().unwrap_or_default().into());
                    }
                    None => {
                        ui.set_dialog_existing(false);
                        ui.set_dialog_author("".into());
                        ui.set_dialog_comment("".into());
                    }
                }
                ui.set_dialog_visible(true);
            }
            SessionEffect::CloseDialog => {
                ui.set_dialog_visible(false);
                ui.set_dialog_comment("".into());
            }
            SessionEffect::CreateMark {
                shape,
                color,
                comment,
            } => {
                let Some(image) = current_image(ctx) else {
                    continue;
                };
                let draft = NewMark {
                    shape,
                    color,
                    comment: Some(comment),
                    author: ctx.author.as_ref().clone(),
                };
                ui.set_busy(true);
                match ctx.repository.create_mark(&image, draft) {
                    Ok(mark) => {
                        ctx.store.borrow_mut().push(mark);
                        (ctx.refresh_rows)();
                        (ctx.redraw)(None);
                        ui.set_status_text("Mark added".into());
                    }
                    Err(e) => {
                        warn!("create mark failed: {e}");
                        ui.set_status_text(format!("Could not save mark: {e}").into());
                    }
                }
                ui.set_busy(false);
            }
            SessionEffect::UpdateComment { id, comment } => {
                let Some(image) = current_image(ctx) else {
                    continue;
                };
                ui.set_busy(true);
                match ctx.repository.update_comment(&image, id, &comment) {
                    Ok(mark) => {
                        ctx.store.borrow_mut().apply_update(mark);
                        (ctx.refresh_rows)();
                        (ctx.redraw)(None);
                        ui.set_status_text("Comment saved".into());
                    }
                    Err(e) => {
                        warn!("update comment failed: {e}");
                        ui.set_status_text(format!("Could not save comment: {e}").into());
                    }
                }
                ui.set_busy(false);
            }
            SessionEffect::DeleteMark { id } => {
                let Some(image) = current_image(ctx) else {
                    continue;
                };
                ui.set_busy(true);
                match ctx.repository.delete_mark(&image, id) {
                    Ok(_) => {
                        ctx.store.borrow_mut().remove(id);
                        (ctx.refresh_rows)();
                        (ctx.redraw)(None);
                        ui.set_status_text("Mark deleted".into());
                    }
                    Err(e) => {
                        warn!("delete mark failed: {e}");
                        ui.set_status_text(format!("Could not delete mark: {e}").into());
                    }
                }
                ui.set_busy(false);
            }
        }
    }
}

fn current_image(ctx: &AppCtx) -> Option<std::path::PathBuf> {
    ctx.loaded.borrow().as_ref().map(|l| l.path.clone())
}
