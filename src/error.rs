//! Error types for model loading, preprocessing, and inference

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The artifact is missing, unreadable, or not a TorchScript module.
    /// Fatal: the service must not serve traffic without a model
    #[error("failed to load model from '{path}': {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: tch::TchError,
    },

    /// The uploaded bytes are not a decodable image
    #[error("could not decode upload as an image: {0}")]
    Decode(#[from] image::ImageError),

    /// The model's output length does not match the label set
    #[error("model produced {actual} scores for {expected} labels")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The forward pass itself failed
    #[error("inference failed: {0}")]
    Inference(#[from] tch::TchError),
}

/// Convenience alias for fallible classifier operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = Error::ShapeMismatch {
            expected: 3,
            actual: 1000,
        };
        assert_eq!(
            format!("{err}"),
            "model produced 1000 scores for 3 labels"
        );
    }

    #[test]
    fn test_decode_display() {
        let err = Error::from(image::load_from_memory(b"junk").unwrap_err());
        assert!(format!("{err}").starts_with("could not decode upload"));
    }
}
