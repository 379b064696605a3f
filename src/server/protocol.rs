//! Wire types for the JSON API

use serde::Serialize;

use crate::classifier::Prediction;

/// Body of a successful predict call
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub class: String,
    pub confidence: f32,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> PredictResponse {
        PredictResponse {
            class: prediction.class,
            confidence: prediction.confidence,
        }
    }
}

/// Body of the liveness route
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}
