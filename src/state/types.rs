use std::path::PathBuf;

use image::RgbaImage;
use uuid::Uuid;

use crate::mark::Mark;

/// The currently displayed image, decoded to RGBA for the renderer.
/// `image` keeps the intrinsic resolution; Slint scales for display.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub image: RgbaImage,
}

impl LoadedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn aspect(&self) -> f32 {
        let (w, h) = self.dimensions();
        if h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }
}

/// In-memory mirror of the persisted marks for the open image. Single
/// writer (the UI event loop); the rendering source of truth between
/// reloads. Mutated optimistically only after a repository call succeeds.
#[derive(Debug, Default)]
pub struct MarkStore {
    marks: Vec<Mark>,
}

impl MarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set, e.g. after a load or a subscription event.
    pub fn replace(&mut self, marks: Vec<Mark>) {
        self.marks = marks;
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Swap in the repository's updated copy of a mark.
    pub fn apply_update(&mut self, updated: Mark) {
        if let Some(slot) = self.marks.iter_mut().find(|m| m.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn remove(&mut self, id: Uuid) {
        self.marks.retain(|m| m.id != id);
    }

    pub fn get(&self, id: Uuid) -> Option<&Mark> {
        self.marks.iter().find(|m| m.id == id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Mark> {
        self.marks.get(index)
    }

    pub fn as_slice(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::{MarkColor, MarkShape};

    fn mark(comment: &str) -> Mark {
        Mark {
            id: Uuid::new_v4(),
            shape: MarkShape::Point { x: 1.0, y: 2.0 },
            color: MarkColor::Green,
            comment: Some(comment.into()),
            author: "test".into(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn replace_swaps_the_whole_set() {
        let mut store = MarkStore::new();
        store.push(mark("old"));
        store.replace(vec![mark("a"), mark("b")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.as_slice()[0].comment.as_deref(), Some("a"));
    }

    #[test]
    fn apply_update_replaces_matching_mark_only() {
        let mut store = MarkStore::new();
        let a = mark("a");
        let b = mark("b");
        store.replace(vec![a.clone(), b.clone()]);

        let mut updated = a.clone();
        updated.comment = Some("edited".into());
        store.apply_update(updated);

        assert_eq!(store.get(a.id).unwrap().comment.as_deref(), Some("edited"));
        assert_eq!(store.get(b.id).unwrap().comment.as_deref(), Some("b"));
    }

    #[test]
    fn remove_is_a_no_op_for_unknown_ids() {
        let mut store = MarkStore::new();
        store.push(mark("keep"));
        store.remove(Uuid::new_v4());
        assert_eq!(store.len(), 1);
    }
}
