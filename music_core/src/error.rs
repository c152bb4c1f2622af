//! Application error types and handling

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed range: {0}")]
    MalformedRange(String),

    #[error("Range not satisfiable for resource of {size} bytes")]
    RangeNotSatisfiable { size: u64 },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MalformedRange(_) => StatusCode::BAD_REQUEST,
            AppError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            AppError::StorageUnavailable(_) | AppError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_message, content_range) = match self {
            AppError::NotFound(msg) => (msg, None),
            AppError::MalformedRange(msg) => (msg, None),
            AppError::RangeNotSatisfiable { size } => (
                "Requested range not satisfiable".to_string(),
                Some(format!("bytes */{}", size)),
            ),
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Storage unavailable: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                ("Internal server error".to_string(), None)
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        let mut response = (status, body).into_response();

        if let Some(value) = content_range.and_then(|v| HeaderValue::from_str(&v).ok()) {
            response.headers_mut().insert(header::CONTENT_RANGE, value);
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("song.mp3".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MalformedRange("items=0-1".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RangeNotSatisfiable { size: 10 }.status_code(),
            StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            AppError::StorageUnavailable("music".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert_eq!(AppError::from(io).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unsatisfiable_response_reports_length() {
        let response = AppError::RangeNotSatisfiable { size: 1000 }.into_response();

        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */1000"
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::StorageUnavailable("/srv/music: permission denied".to_string())
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::CONTENT_RANGE).is_none());
    }
}
