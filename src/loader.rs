//! Process-wide model state: the classifier is loaded at most once and the
//! handle is shared read-only across requests

use std::path::PathBuf;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::classifier::Classifier;
use crate::error::Result;

/// Holder around the lazily-loaded classifier. The `OnceCell` guards the
/// first-load race: concurrent first requests block on one load instead of
/// reading the artifact twice
pub struct ModelState {
    path: PathBuf,
    cell: OnceCell<Classifier>,
}

impl ModelState {
    pub fn new(path: PathBuf) -> Self {
        ModelState {
            path,
            cell: OnceCell::new(),
        }
    }

    /// Return the loaded classifier, reading the artifact on first use.
    /// A failed load leaves the cell empty and surfaces the error
    pub fn ensure(&self) -> Result<&Classifier> {
        self.cell.get_or_try_init(|| {
            info!("loading model from {}", self.path.display());
            let classifier = Classifier::load(&self.path)?;
            info!("model loaded");
            Ok(classifier)
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_missing_artifact_keeps_state_unloaded() {
        let state = ModelState::new(PathBuf::from("models/definitely-missing.pt"));
        assert!(!state.is_loaded());

        let err = state.ensure().unwrap_err();
        assert!(matches!(err, Error::ModelLoad { .. }));
        assert!(!state.is_loaded());

        // A failed load is not cached; the next call tries the path again
        assert!(state.ensure().is_err());
    }
}
