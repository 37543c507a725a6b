//! Image gallery: the set of images under review and the cursor into it.
//!
//! Opened from a single image file or a folder; folders are scanned
//! non-recursively for image files and sorted by name so navigation order
//! is stable between runs.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("no image files found in {0}")]
    Empty(PathBuf),

    #[error("failed to read folder {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Gallery {
    images: Vec<PathBuf>,
    current: usize,
}

impl Gallery {
    /// Open a gallery from an image file (single entry) or a folder.
    pub fn open(path: &Path) -> Result<Self, GalleryError> {
        if !path.exists() {
            return Err(GalleryError::NotFound(path.to_path_buf()));
        }
        if path.is_file() {
            return Ok(Self {
                images: vec![path.to_path_buf()],
                current: 0,
            });
        }

        let entries = fs::read_dir(path).map_err(|source| GalleryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut images: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_image_extension(p))
            .collect();

        if images.is_empty() {
            return Err(GalleryError::Empty(path.to_path_buf()));
        }
        images.sort();

        Ok(Self { images, current: 0 })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Path {
        &self.images[self.current]
    }

    /// Move the cursor; clamps at the ends rather than wrapping.
    pub fn set_index(&mut self, index: usize) {
        if index < self.images.len() {
            self.current = index;
        }
    }

    pub fn next_index(&self) -> usize {
        (self.current + 1).min(self.images.len() - 1)
    }

    pub fn prev_index(&self) -> usize {
        self.current.saturating_sub(1)
    }

    /// "3 / 12" style label for the status bar.
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current + 1, self.images.len())
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
