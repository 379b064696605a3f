//! Code for loading and running the trained potato disease model

use std::path::Path;

use serde::Serialize;
use tch::{no_grad, CModule, Device, Kind, Tensor};
use tracing::debug;

use crate::error::{Error, Result};
use crate::preprocess::IMAGE_SIZE;

/// Class labels, positionally aligned with the model's output vector
pub const CLASS_LABELS: [&str; 3] = ["Healthy", "Early Blight", "Late Blight"];

/// A class prediction outputted by the classifier
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub class: String,
    pub confidence: f32,
}

/// Load and run a TorchScript classifier
#[derive(Debug)]
pub struct Classifier {
    /// The loaded torch model
    model: CModule,
}

impl Classifier {
    /// Load the artifact and push one zero tensor through it, so a missing
    /// file, a malformed module, or a label/output mismatch all fail here
    /// rather than on the first real request
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let model = CModule::load(path).map_err(|source| Error::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let classifier = Classifier { model };

        let probe = Tensor::zeros(
            [1, IMAGE_SIZE as i64, IMAGE_SIZE as i64, 3],
            (Kind::Float, Device::Cpu),
        );
        let scores = classifier.scores(&probe)?;
        if scores.len() != CLASS_LABELS.len() {
            return Err(Error::ShapeMismatch {
                expected: CLASS_LABELS.len(),
                actual: scores.len(),
            });
        }

        Ok(classifier)
    }

    /// Classify a preprocessed image tensor
    pub fn predict(&self, input: &Tensor) -> Result<Prediction> {
        let scores = self.scores(input)?;
        debug!("raw scores: {scores:?}");
        top_class(&scores)
    }

    /// Run a forward pass and flatten the raw output vector. The model ends
    /// in a softmax layer, so the scores are used as-is
    fn scores(&self, input: &Tensor) -> Result<Vec<f32>> {
        let output = no_grad(|| self.model.forward_ts(&[input]))?;
        let flat = output.view([-1]);

        let mut scores = Vec::with_capacity(CLASS_LABELS.len());
        let mut values = flat.iter::<f64>()?;
        while let Some(value) = values.next() {
            scores.push(value as f32);
        }
        Ok(scores)
    }
}

/// Map an output vector to the label and score at its arg-max
fn top_class(scores: &[f32]) -> Result<Prediction> {
    if scores.len() != CLASS_LABELS.len() {
        return Err(Error::ShapeMismatch {
            expected: CLASS_LABELS.len(),
            actual: scores.len(),
        });
    }

    let mut top = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[top] {
            top = i;
        }
    }

    Ok(Prediction {
        class: CLASS_LABELS[top].to_string(),
        confidence: scores[top],
    })
}
