use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use mime::Mime;
use std::io::{ErrorKind, SeekFrom};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tokio_util::io::ReaderStream;

use super::range::{ByteRangeRequest, RangeSpec};
use crate::catalog::Catalog;
use crate::error::{AppError, Result};

/// Reply for a stream request.
///
/// The body is read lazily from `reader`, which is already positioned at
/// the first byte and limited to `content_length` bytes.
#[derive(Debug)]
pub struct StreamResponse {
    pub status: StatusCode,
    pub content_type: Mime,
    pub content_range: Option<String>,
    pub content_length: u64,
    pub reader: Take<File>,
}

impl IntoResponse for StreamResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(self.content_type.as_ref())
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
        );
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.content_length));

        if let Some(value) = self
            .content_range
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(header::CONTENT_RANGE, value);
        }

        let body = Body::from_stream(ReaderStream::new(self.reader));

        (self.status, headers, body).into_response()
    }
}

/// Serves files from the catalog's root, honoring at most one byte range.
///
/// Each request owns its file handle; it is closed when the response body
/// finishes or is dropped, so requests share nothing but the root path.
#[derive(Debug, Clone)]
pub struct StreamHandler {
    catalog: Catalog,
}

impl StreamHandler {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub async fn serve(
        &self,
        identifier: &str,
        range_header: Option<&str>,
    ) -> Result<StreamResponse> {
        let path = self.catalog.resolve(identifier)?;
        let mut file = open_media(&self.catalog, &path, identifier).await?;

        // Size comes from the open handle so validation and read agree.
        let size = file.metadata().await?.len();
        let content_type = mime_guess::from_path(&path).first_or(mime::APPLICATION_OCTET_STREAM);

        let Some(header) = range_header else {
            tracing::debug!(identifier, size, "Streaming full file");

            return Ok(StreamResponse {
                status: StatusCode::OK,
                content_type,
                content_range: None,
                content_length: size,
                reader: file.take(size),
            });
        };

        let range: RangeSpec = ByteRangeRequest::parse(header)?.resolve(size)?;

        tracing::debug!(
            identifier,
            start = range.start,
            end = range.end,
            size,
            "Streaming partial file"
        );

        file.seek(SeekFrom::Start(range.start)).await?;

        Ok(StreamResponse {
            status: StatusCode::PARTIAL_CONTENT,
            content_type,
            content_range: Some(range.content_range(size)),
            content_length: range.content_length(),
            reader: file.take(range.content_length()),
        })
    }
}

async fn open_media(catalog: &Catalog, path: &Path, identifier: &str) -> Result<File> {
    let not_found = || AppError::NotFound(format!("File not found: {}", identifier));

    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    if !file.metadata().await?.is_file() || !catalog.contains(path).await? {
        return Err(not_found());
    }

    Ok(file)
}
