// Error translation for the notes API
// Every failure maps to exactly one status code and `{"error": ...}` body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use super::response::error_response;
use crate::logger;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Required input absent; raised before any store call
    #[error("{0} missing")]
    MissingField(&'static str),

    #[error("malformatted json")]
    MalformedJson,

    /// JSON parsed but has the wrong shape, or the body could not be read
    #[error("{0}")]
    InvalidBody(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_)
            | Self::MalformedJson
            | Self::InvalidBody(_)
            | Self::Store(StoreError::InvalidId(_) | StoreError::ValidationFailed(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Unavailable(_) | StoreError::IdsExhausted) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the client
    fn client_message(&self) -> String {
        match self {
            Self::Store(StoreError::InvalidId(_)) => "malformatted id".to_string(),
            Self::Store(StoreError::NotFound(_)) => "note not found".to_string(),
            Self::Store(StoreError::Unavailable(_) | StoreError::IdsExhausted) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status();
        if status.is_server_error() {
            logger::log_error(&self.to_string());
        } else {
            logger::log_warning(&self.to_string());
        }
        error_response(status, &self.client_message())
    }
}
