//! Gallery adapter: static model-evaluation images.
//!
//! The training pipeline ships a fixed set of evaluation plots next to the
//! model. They are read-only; a missing image is a warning, never an error,
//! so reporting stays available with a partial set.

use std::path::{Path, PathBuf};

/// The known evaluation images: display title and file name.
/// File names come from the training pipeline and are fixed.
pub const GALLERY_IMAGES: [(&str, &str); 5] = [
    ("Confusion matrix", "confusion_matrix.png"),
    ("ROC curve", "roc_curve.png"),
    ("Feature importance", "feature_importance.png"),
    ("Class distribution", "distribusi_kelas.png"),
    ("Feature correlation", "korelasi.png"),
];

/// Availability of one gallery image.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub title: &'static str,
    pub file_name: &'static str,
    /// Full path when the file exists on disk
    pub path: Option<PathBuf>,
}

/// Lookup over the visualization directory.
pub struct Gallery {
    dir: PathBuf,
}

impl Gallery {
    /// Create a gallery over the given directory.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the images are looked up in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Status of every known image. Missing files are logged and reported
    /// with `path: None`.
    #[must_use]
    pub fn entries(&self) -> Vec<GalleryEntry> {
        GALLERY_IMAGES
            .iter()
            .copied()
            .map(|(title, file_name)| {
                let path = self.dir.join(file_name);
                if path.exists() {
                    GalleryEntry {
                        title,
                        file_name,
                        path: Some(path),
                    }
                } else {
                    tracing::warn!("Gallery image {file_name:?} not found in {:?}", self.dir);
                    GalleryEntry {
                        title,
                        file_name,
                        path: None,
                    }
                }
            })
            .collect()
    }

    /// Only the images that exist on disk.
    #[must_use]
    pub fn available(&self) -> Vec<GalleryEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.path.is_some())
            .collect()
    }
}
