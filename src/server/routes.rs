//! The user-facing JSON web server that listens for inference requests. This
//! is the "front end": one upload route and one liveness route.

use actix_multipart::Multipart;
use actix_web::{get, post, web, Responder};
use anyhow::anyhow;
use futures_util::TryStreamExt;
use tracing::info;

use super::protocol::{PredictResponse, StatusResponse};
use super::WebError;
use crate::classifier::Prediction;
use crate::loader::ModelState;
use crate::preprocess;

type Result<T> = std::result::Result<T, WebError>;

/// Drain the multipart payload and return the bytes of its `file` field
async fn read_upload(mut payload: Multipart) -> Result<Vec<u8>> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != "file" {
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            data.extend_from_slice(&chunk);
        }
        return Ok(data);
    }

    Err(WebError::bad_request("missing 'file' field in multipart upload"))
}

/// Handle HTTP request for inference
#[post("/predict")]
pub async fn predict(
    payload: Multipart,
    state: web::Data<ModelState>,
) -> Result<impl Responder> {
    let raw = read_upload(payload).await?;

    // Decode, resize, and the forward pass are all synchronous; run them on
    // the blocking pool. An undecodable upload is rejected before the model
    // handle is taken
    let prediction: Prediction = web::block(move || {
        let input = preprocess::preprocess(&raw)?;
        let model = state.ensure()?;
        model.predict(&input)
    })
    .await
    .map_err(|e| WebError::from(anyhow!("blocking task failed: {e}")))??;

    info!(
        "served prediction: {} ({:.3})",
        prediction.class, prediction.confidence
    );

    Ok(web::Json(PredictResponse::from(prediction)))
}

/// Liveness/info route; answers the same regardless of model state
#[get("/")]
pub async fn home() -> impl Responder {
    web::Json(StatusResponse {
        message: "Potato Disease Classification API is running".to_string(),
    })
}
