//! On-disk cache for per-image homographies.

use crate::{Homography, HomographyError};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum HomographyIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] HomographyError),
    #[error("homography estimation failed: {0}")]
    Estimator(String),
}

/// External collaborator that fits a frame → pitch homography for an image.
pub trait HomographyEstimator {
    fn estimate(&self, image_path: &Path) -> Result<Homography, HomographyIoError>;
}

/// Homography cache keyed by a results directory.
///
/// The matrix lives in `<dir>/homography.json` as a row-major 3×3 array.
#[derive(Clone, Debug)]
pub struct HomographyStore {
    dir: PathBuf,
}

impl HomographyStore {
    pub const FILE_NAME: &'static str = "homography.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(Self::FILE_NAME)
    }

    /// Read a homography JSON file from an explicit path.
    pub fn read(path: impl AsRef<Path>) -> Result<Homography, HomographyIoError> {
        let raw = fs::read_to_string(path)?;
        let h: Homography = serde_json::from_str(&raw)?;
        h.validate()?;
        Ok(h)
    }

    /// Write a homography JSON file to an explicit path.
    pub fn write(h: &Homography, path: impl AsRef<Path>) -> Result<(), HomographyIoError> {
        let json = serde_json::to_string_pretty(h)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load the cached matrix, `None` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<Homography>, HomographyIoError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let h = Self::read(&path)?;
        info!("loaded homography from {}", path.display());
        Ok(Some(h))
    }

    pub fn save(&self, h: &Homography) -> Result<(), HomographyIoError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        Self::write(h, &path)?;
        info!("saved homography to {}", path.display());
        Ok(())
    }

    /// Load the cached matrix, or run `estimator` on the image and cache its result.
    pub fn load_or_estimate(
        &self,
        image_path: &Path,
        estimator: &dyn HomographyEstimator,
    ) -> Result<Homography, HomographyIoError> {
        if let Some(h) = self.load()? {
            return Ok(h);
        }
        debug!("no cached homography in {}, estimating", self.dir.display());
        let h = estimator.estimate(image_path)?;
        h.validate()?;
        self.save(&h)?;
        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingEstimator {
        calls: Cell<usize>,
        h: Homography,
    }

    impl HomographyEstimator for CountingEstimator {
        fn estimate(&self, _image_path: &Path) -> Result<Homography, HomographyIoError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.h)
        }
    }

    struct FailingEstimator;

    impl HomographyEstimator for FailingEstimator {
        fn estimate(&self, image_path: &Path) -> Result<Homography, HomographyIoError> {
            Err(HomographyIoError::Estimator(format!(
                "no pitch found in {}",
                image_path.display()
            )))
        }
    }

    #[test]
    fn empty_store_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = HomographyStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_returns_same_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let store = HomographyStore::new(dir.path().join("results"));
        let h = Homography::from_array([[1.1, 0.2, 0.0], [0.0, 0.9, 0.1], [0.01, 0.2, 1.0]]);
        store.save(&h).unwrap();
        assert_eq!(store.load().unwrap(), Some(h));
    }

    #[test]
    fn estimator_runs_once_then_cache_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let store = HomographyStore::new(dir.path());
        let est = CountingEstimator {
            calls: Cell::new(0),
            h: Homography::identity(),
        };
        let image = Path::new("frame.jpg");
        let first = store.load_or_estimate(image, &est).unwrap();
        let second = store.load_or_estimate(image, &est).unwrap();
        assert_eq!(first, second);
        assert_eq!(est.calls.get(), 1);
        assert!(store.path().exists());
    }

    #[test]
    fn estimator_failure_is_propagated_and_nothing_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let store = HomographyStore::new(dir.path());
        let err = store
            .load_or_estimate(Path::new("frame.jpg"), &FailingEstimator)
            .unwrap_err();
        assert!(matches!(err, HomographyIoError::Estimator(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = HomographyStore::new(dir.path());
        fs::write(store.path(), "[[1.0, 2.0]]").unwrap();
        assert!(matches!(store.load(), Err(HomographyIoError::Json(_))));
    }
}
