//! Interaction state machine for the annotation canvas.
//!
//! The session is an explicit value, not ambient component state: every
//! pointer or dialog event goes through [`Session::handle`], which returns
//! the effects the UI layer must apply (preview updates, dialog visibility,
//! repository mutations). This keeps the transitions testable without a
//! window.
//!
//! States:
//! - `Idle`            marking mode off; clicks select existing marks
//! - `Armed`           marking mode on, no drag active
//! - `Dragging`        mouse down, live preview visible
//! - `CommentEditing`  a draft or existing mark is open in the dialog

use uuid::Uuid;

use crate::geometry::ImagePoint;
use crate::mark::{preview_shape, shape_from_drag, MarkColor, MarkKind, MarkShape};

/// What the comment dialog is editing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogTarget {
    /// A completed drag held in memory, not yet persisted. Color is
    /// captured at drag end so later palette changes don't retint it.
    Draft { shape: MarkShape, color: MarkColor },
    /// A persisted mark opened for comment view/edit/delete.
    Existing(Uuid),
}

/// Which stable state the dialog was entered from, and therefore returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOrigin {
    Browsing,
    Marking,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    Armed,
    Dragging { anchor: ImagePoint },
    CommentEditing {
        target: DialogTarget,
        origin: DialogOrigin,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Marking mode toggled on or off.
    SetMarking(bool),
    PointerDown(ImagePoint),
    PointerMove(ImagePoint),
    PointerUp(ImagePoint),
    /// An existing mark was clicked (canvas hit test or sidebar row).
    MarkClicked(Uuid),
    /// Dialog confirmed with a non-empty comment.
    SubmitComment(String),
    /// Dialog delete pressed (existing marks only).
    DeleteRequested,
    /// Dialog closed without submitting; drafts are discarded.
    DialogDismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    ShowPreview { shape: MarkShape, color: MarkColor },
    HidePreview,
    OpenDialog { existing: Option<Uuid> },
    CloseDialog,
    CreateMark {
        shape: MarkShape,
        color: MarkColor,
        comment: String,
    },
    UpdateComment { id: Uuid, comment: String },
    DeleteMark { id: Uuid },
}

/// The drawing session: current state plus the armed tool and color.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    pub tool: MarkKind,
    pub color: MarkColor,
}

impl Session {
    pub fn new(tool: MarkKind, color: MarkColor) -> Self {
        Self {
            state: SessionState::Idle,
            tool,
            color,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_marking(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }

    /// Advance the state machine. Returns the effects to apply, in order.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        match event {
            SessionEvent::SetMarking(on) => self.set_marking(on),
            SessionEvent::PointerDown(p) => self.pointer_down(p),
            SessionEvent::PointerMove(p) => self.pointer_move(p),
            SessionEvent::PointerUp(p) => self.pointer_up(p),
            SessionEvent::MarkClicked(id) => self.mark_clicked(id),
            SessionEvent::SubmitComment(comment) => self.submit(comment),
            SessionEvent::DeleteRequested => self.delete(),
            SessionEvent::DialogDismissed => self.dismiss(),
        }
    }

    fn set_marking(&mut self, on: bool) -> Vec<SessionEffect> {
        match (&self.state, on) {
            (SessionState::Idle, true) => {
                self.state = SessionState::Armed;
                vec![]
            }
            (SessionState::Armed, false) => {
                self.state = SessionState::Idle;
                vec![]
            }
            // Toggling off mid-drag discards the draft and its preview.
            (SessionState::Dragging { .. }, false) => {
                self.state = SessionState::Idle;
                vec![SessionEffect::HidePreview]
            }
            _ => vec![],
        }
    }

    fn pointer_down(&mut self, p: ImagePoint) -> Vec<SessionEffect> {
        match self.state {
            SessionState::Armed => {
                self.state = SessionState::Dragging { anchor: p };
                vec![SessionEffect::ShowPreview {
                    shape: preview_shape(self.tool, p, p),
                    color: self.color,
                }]
            }
            // In Idle the click is resolved on release via the hit tester.
            _ => vec![],
        }
    }

    fn pointer_move(&mut self, p: ImagePoint) -> Vec<SessionEffect> {
        match self.state {
            SessionState::Dragging { anchor } => vec![SessionEffect::ShowPreview {
                shape: preview_shape(self.tool, anchor, p),
                color: self.color,
            }],
            _ => vec![],
        }
    }

    fn pointer_up(&mut self, p: ImagePoint) -> Vec<SessionEffect> {
        let SessionState::Dragging { anchor } = self.state else {
            return vec![];
        };
        match shape_from_drag(self.tool, anchor, p) {
            Some(shape) => {
                self.state = SessionState::CommentEditing {
                    target: DialogTarget::Draft {
                        shape,
                        color: self.color,
                    },
                    origin: DialogOrigin::Marking,
                };
                vec![
                    SessionEffect::HidePreview,
                    SessionEffect::OpenDialog { existing: None },
                ]
            }
            // Sub-threshold gesture: silently discard, no mark, no error.
            None => {
                self.state = SessionState::Armed;
                vec![SessionEffect::HidePreview]
            }
        }
    }

    fn mark_clicked(&mut self, id: Uuid) -> Vec<SessionEffect> {
        let origin = match self.state {
            SessionState::Idle => DialogOrigin::Browsing,
            SessionState::Armed => DialogOrigin::Marking,
            _ => return vec![],
        };
        self.state = SessionState::CommentEditing {
            target: DialogTarget::Existing(id),
            origin,
        };
        vec![SessionEffect::OpenDialog { existing: Some(id) }]
    }

    fn submit(&mut self, comment: String) -> Vec<SessionEffect> {
        let SessionState::CommentEditing { target, origin } = self.state else {
            return vec![];
        };
        // Empty comments never reach the repository; the dialog disables
        // submission until text is entered.
        if comment.is_empty() {
            return vec![];
        }
        self.state = Self::stable_state(origin);
        let mutation = match target {
            DialogTarget::Draft { shape, color } => SessionEffect::CreateMark {
                shape,
                color,
                comment,
            },
            DialogTarget::Existing(id) => SessionEffect::UpdateComment { id, comment },
        };
        vec![mutation, SessionEffect::CloseDialog]
    }

    fn delete(&mut self) -> Vec<SessionEffect> {
        let SessionState::CommentEditing {
            target: DialogTarget::Existing(id),
            origin,
        } = self.state
        else {
            return vec![];
        };
        self.state = Self::stable_state(origin);
        vec![SessionEffect::DeleteMark { id }, SessionEffect::CloseDialog]
    }

    fn dismiss(&mut self) -> Vec<SessionEffect> {
        let SessionState::CommentEditing { origin, .. } = self.state else {
            return vec![];
        };
        // Draft marks are dropped here; no comment-less mark is persisted.
        self.state = Self::stable_state(origin);
        vec![SessionEffect::CloseDialog]
    }

    fn stable_state(origin: DialogOrigin) -> SessionState {
        match origin {
            DialogOrigin::Browsing => SessionState::Idle,
            DialogOrigin::Marking => SessionState::Armed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> ImagePoint {
        ImagePoint { x, y }
    }

    fn armed_session(tool: MarkKind) -> Session {
        let mut session = Session::new(tool, MarkColor::Red);
        session.handle(SessionEvent::SetMarking(true));
        assert_eq!(*session.state(), SessionState::Armed);
        session
    }

    #[test]
    fn drag_with_valid_geometry_opens_dialog() {
        let mut session = armed_session(MarkKind::Rect);
        session.handle(SessionEvent::PointerDown(pt(0.0, 0.0)));
        session.handle(SessionEvent::PointerMove(pt(60.0, 20.0)));
        let effects = session.handle(SessionEvent::PointerUp(pt(100.0, 50.0)));
        assert_eq!(
            effects,
            vec![
                SessionEffect::HidePreview,
                SessionEffect::OpenDialog { existing: None }
            ]
        );
        assert!(matches!(
            session.state(),
            SessionState::CommentEditing {
                target: DialogTarget::Draft { .. },
                origin: DialogOrigin::Marking
            }
        ));
    }

    #[test]
    fn sub_threshold_drag_returns_to_armed_without_mark() {
        let mut session = armed_session(MarkKind::Circle);
        session.handle(SessionEvent::PointerDown(pt(10.0, 10.0)));
        let effects = session.handle(SessionEvent::PointerUp(pt(14.0, 10.0)));
        assert_eq!(effects, vec![SessionEffect::HidePreview]);
        assert_eq!(*session.state(), SessionState::Armed);
    }

    #[test]
    fn dialog_cancel_discards_draft() {
        let mut session = armed_session(MarkKind::Rect);
        session.handle(SessionEvent::PointerDown(pt(0.0, 0.0)));
        session.handle(SessionEvent::PointerUp(pt(100.0, 50.0)));
        let effects = session.handle(SessionEvent::DialogDismissed);
        // No CreateMark effect is ever emitted for the dismissed draft.
        assert_eq!(effects, vec![SessionEffect::CloseDialog]);
        assert_eq!(*session.state(), SessionState::Armed);
    }

    #[test]
    fn submit_creates_mark_with_comment_and_captured_color() {
        let mut session = armed_session(MarkKind::Rect);
        session.handle(SessionEvent::PointerDown(pt(0.0, 0.0)));
        session.handle(SessionEvent::PointerUp(pt(100.0, 50.0)));
        // Palette change after drag end must not retint the draft.
        session.color = MarkColor::Purple;
        let effects = session.handle(SessionEvent::SubmitComment("issue here".into()));
        assert_eq!(
            effects,
            vec![
                SessionEffect::CreateMark {
                    shape: MarkShape::Rect {
                        x: 0.0,
                        y: 0.0,
                        width: 100.0,
                        height: 50.0
                    },
                    color: MarkColor::Red,
                    comment: "issue here".into(),
                },
                SessionEffect::CloseDialog
            ]
        );
        assert_eq!(*session.state(), SessionState::Armed);
    }

    #[test]
    fn empty_comment_is_not_committed() {
        let mut session = armed_session(MarkKind::Rect);
        session.handle(SessionEvent::PointerDown(pt(0.0, 0.0)));
        session.handle(SessionEvent::PointerUp(pt(100.0, 50.0)));
        let effects = session.handle(SessionEvent::SubmitComment(String::new()));
        assert!(effects.is_empty());
        assert!(matches!(
            session.state(),
            SessionState::CommentEditing { .. }
        ));
    }

    #[test]
    fn clicking_existing_mark_while_idle_opens_and_returns_to_idle() {
        let id = Uuid::new_v4();
        let mut session = Session::new(MarkKind::Point, MarkColor::Blue);
        let effects = session.handle(SessionEvent::MarkClicked(id));
        assert_eq!(effects, vec![SessionEffect::OpenDialog { existing: Some(id) }]);

        let effects = session.handle(SessionEvent::SubmitComment("updated".into()));
        assert_eq!(
            effects,
            vec![
                SessionEffect::UpdateComment {
                    id,
                    comment: "updated".into()
                },
                SessionEffect::CloseDialog
            ]
        );
        assert_eq!(*session.state(), SessionState::Idle);
    }

    #[test]
    fn delete_from_dialog_emits_single_mutation() {
        let id = Uuid::new_v4();
        let mut session = Session::new(MarkKind::Point, MarkColor::Blue);
        session.handle(SessionEvent::MarkClicked(id));
        let effects = session.handle(SessionEvent::DeleteRequested);
        assert_eq!(
            effects,
            vec![SessionEffect::DeleteMark { id }, SessionEffect::CloseDialog]
        );
        assert_eq!(*session.state(), SessionState::Idle);
    }

    #[test]
    fn delete_is_rejected_for_drafts() {
        let mut session = armed_session(MarkKind::Rect);
        session.handle(SessionEvent::PointerDown(pt(0.0, 0.0)));
        session.handle(SessionEvent::PointerUp(pt(100.0, 50.0)));
        assert!(session.handle(SessionEvent::DeleteRequested).is_empty());
    }

    #[test]
    fn toggling_off_mid_drag_hides_preview() {
        let mut session = armed_session(MarkKind::Rect);
        session.handle(SessionEvent::PointerDown(pt(0.0, 0.0)));
        let effects = session.handle(SessionEvent::SetMarking(false));
        assert_eq!(effects, vec![SessionEffect::HidePreview]);
        assert_eq!(*session.state(), SessionState::Idle);
    }

    #[test]
    fn pointer_events_are_ignored_while_idle() {
        let mut session = Session::new(MarkKind::Rect, MarkColor::Blue);
        assert!(session.handle(SessionEvent::PointerDown(pt(1.0, 1.0))).is_empty());
        assert!(session.handle(SessionEvent::PointerMove(pt(2.0, 2.0))).is_empty());
        assert!(session.handle(SessionEvent::PointerUp(pt(3.0, 3.0))).is_empty());
        assert_eq!(*session.state(), SessionState::Idle);
    }
}
