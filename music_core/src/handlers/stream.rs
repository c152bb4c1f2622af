use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
};
use tracing::Level;

use crate::{
    error::{AppError, Result},
    streaming::StreamResponse,
    AppState,
};

pub async fn handle_stream(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<StreamResponse> {
    let range = match headers.get(header::RANGE) {
        Some(value) => Some(value.to_str().map_err(|_| {
            let err = AppError::MalformedRange("range header is not visible ASCII".to_string());
            log_failure(&filename, None, &err);
            err
        })?),
        None => None,
    };

    state
        .stream_handler
        .serve(&filename, range)
        .await
        .inspect_err(|err| log_failure(&filename, range, err))
}

fn log_failure(filename: &str, range: Option<&str>, err: &AppError) {
    if failure_level(err) == Level::WARN {
        tracing::warn!(filename, range, "Rejected stream request: {}", err);
    } else {
        tracing::error!(filename, range, "Error streaming file: {}", err);
    }
}

/// Client mistakes are warnings; anything the server failed at is an error.
fn failure_level(err: &AppError) -> Level {
    if err.status_code().is_client_error() {
        Level::WARN
    } else {
        Level::ERROR
    }
}
