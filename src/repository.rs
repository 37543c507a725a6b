//! Mark persistence.
//!
//! Marks live in a JSON sidecar next to each image (`photo.png` ->
//! `photo.marks.json`), so a folder of images carries its review state with
//! it. The repository assigns ids and timestamps on creation and notifies
//! subscribers through an mpsc channel after every mutation; consumers react
//! by re-fetching the full list, there is no incremental diffing contract.
//!
//! Last write wins. No version checks, no in-flight cancellation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::mark::{Mark, NewMark};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to access mark file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed mark file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("mark {0} not found")]
    NotFound(Uuid),
}

/// Out-of-band change notification. Payload-free: receivers reload the
/// full mark list for the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkEvent {
    Changed,
}

pub trait MarkRepository {
    /// All marks for an image, in stored (creation) order. A missing
    /// sidecar is an empty list, not an error.
    fn list_marks(&self, image: &Path) -> Result<Vec<Mark>, RepositoryError>;

    /// Persist a new mark; returns it with assigned id and timestamp.
    fn create_mark(&self, image: &Path, draft: NewMark) -> Result<Mark, RepositoryError>;

    /// Replace the comment of an existing mark. Geometry is immutable.
    fn update_comment(
        &self,
        image: &Path,
        id: Uuid,
        comment: &str,
    ) -> Result<Mark, RepositoryError>;

    /// Delete a mark; `Ok(false)` when no mark with that id exists.
    fn delete_mark(&self, image: &Path, id: Uuid) -> Result<bool, RepositoryError>;

    /// Subscribe to change events for an image. The receiver stays valid
    /// until dropped; dead receivers are pruned on the next notification.
    fn subscribe(&self, image: &Path) -> mpsc::Receiver<MarkEvent>;
}

/// Sidecar path for an image: same directory, `.marks.json` extension.
pub fn sidecar_path(image: &Path) -> PathBuf {
    image.with_extension("marks.json")
}

/// File-backed repository. Single-threaded by design: it lives on the UI
/// event loop and is only reached through `Rc`.
#[derive(Default)]
pub struct JsonMarkRepository {
    subscribers: RefCell<HashMap<PathBuf, Vec<mpsc::Sender<MarkEvent>>>>,
}

impl JsonMarkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, image: &Path) -> Result<Vec<Mark>, RepositoryError> {
        let path = sidecar_path(image);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(|source| RepositoryError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RepositoryError::Malformed { path, source })
    }

    fn write(&self, image: &Path, marks: &[Mark]) -> Result<(), RepositoryError> {
        let path = sidecar_path(image);
        let json = serde_json::to_string_pretty(marks).map_err(|source| {
            RepositoryError::Malformed {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, json).map_err(|source| RepositoryError::Io { path, source })?;
        self.notify(image);
        Ok(())
    }

    fn notify(&self, image: &Path) {
        let mut subs = self.subscribers.borrow_mut();
        if let Some(senders) = subs.get_mut(image) {
            senders.retain(|tx| tx.send(MarkEvent::Changed).is_ok());
        }
    }
}

impl MarkRepository for JsonMarkRepository {
    fn list_marks(&self, image: &Path) -> Result<Vec<Mark>, RepositoryError> {
        self.read(image)
    }

    fn create_mark(&self, image: &Path, draft: NewMark) -> Result<Mark, RepositoryError> {
        let mut marks = self.read(image)?;
        let mark = Mark {
            id: Uuid::new_v4(),
            shape: draft.shape,
            color: draft.color,
            comment: draft.comment,
            author: draft.author,
            created_at: chrono::Utc::now(),
        };
        marks.push(mark.clone());
        self.write(image, &marks)?;
        info!(image = %image.display(), id = %mark.id, "mark created");
        Ok(mark)
    }

    fn update_comment(
        &self,
        image: &Path,
        id: Uuid,
        comment: &str,
    ) -> Result<Mark, RepositoryError> {
        let mut marks = self.read(image)?;
        let mark = marks
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        mark.comment = Some(comment.to_string());
        let updated = mark.clone();
        self.write(image, &marks)?;
        debug!(image = %image.display(), id = %id, "mark comment updated");
        Ok(updated)
    }

    fn delete_mark(&self, image: &Path, id: Uuid) -> Result<bool, RepositoryError> {
        let mut marks = self.read(image)?;
        let before = marks.len();
        marks.retain(|m| m.id != id);
        if marks.len() == before {
            return Ok(false);
        }
        self.write(image, &marks)?;
        info!(image = %image.display(), id = %id, "mark deleted");
        Ok(true)
    }

    fn subscribe(&self, image: &Path) -> mpsc::Receiver<MarkEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .borrow_mut()
            .entry(image.to_path_buf())
            .or_default()
            .push(tx);
        rx
    }
}
