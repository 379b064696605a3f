use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use anyhow::anyhow;
use std::collections::HashMap;

use crate::error::Error;

pub mod protocol;
pub mod routes;

/// Request-level failure: the wrapped error plus the status it maps to
#[derive(Debug)]
pub struct WebError {
    err: anyhow::Error,
    status: StatusCode,
}

impl WebError {
    pub fn bad_request(msg: &str) -> Self {
        WebError {
            err: anyhow!("{msg}"),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl actix_web::error::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let err = HashMap::from([("errors", vec![self.to_string()])]);

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(err)
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for WebError {
    fn from(err: Error) -> WebError {
        // An undecodable upload is the caller's fault; everything else
        // (model load, shape, inference) is ours
        let status = match err {
            Error::Decode(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        WebError {
            err: err.into(),
            status,
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> WebError {
        WebError {
            err,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<actix_multipart::MultipartError> for WebError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        WebError {
            err: anyhow!("{err}"),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;

    #[test]
    fn test_decode_maps_to_bad_request() {
        let decode_err = image::load_from_memory(b"junk").unwrap_err();
        let web_err = WebError::from(Error::from(decode_err));
        assert_eq!(web_err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_shape_mismatch_maps_to_server_error() {
        let web_err = WebError::from(Error::ShapeMismatch {
            expected: 3,
            actual: 5,
        });
        assert_eq!(web_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
