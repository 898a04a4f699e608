//! Attachment responses for staged media.

use axum::{
    body::Body,
    http::{header, HeaderName, StatusCode},
    response::Response,
};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reelgate_core::{Error, Result};
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::fetch::MediaFile;

/// CORS headers sent on every attachment, with or without a preflight.
pub const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "Content-Type, Authorization, Content-Disposition",
    ),
    (header::ACCESS_CONTROL_EXPOSE_HEADERS, "Content-Disposition"),
];

pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}

/// Build a `200 video/mp4` attachment response that streams `file` in
/// `chunk_size` reads and deletes it afterwards.
///
/// If the file cannot be opened the guard is released and an error is
/// returned before any header is sent.
pub async fn stream_attachment(mut file: MediaFile, chunk_size: usize) -> Result<Response> {
    let (handle, len) = match open(&file).await {
        Ok(opened) => opened,
        Err(e) => {
            tracing::error!(path = %file.path().display(), "Failed to open staged media: {}", e);
            file.release();
            return Err(e.into());
        }
    };

    let filename = file.attachment_name();
    tracing::info!(%filename, bytes = len, "Streaming attachment");

    let body = Body::from_stream(body_stream(file, handle, chunk_size));

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_DISPOSITION, attachment_disposition(&filename))
        .header(header::CONTENT_LENGTH, len.to_string());
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }

    builder
        .body(body)
        .map_err(|e| Error::Internal(format!("failed to build attachment response: {e}")))
}

async fn open(file: &MediaFile) -> std::io::Result<(File, u64)> {
    let handle = File::open(file.path()).await?;
    let len = handle.metadata().await?.len();
    Ok((handle, len))
}

/// Chunk stream that owns the guard. End of file and read errors release it
/// explicitly; dropping the stream early releases it through `Drop`.
fn body_stream<R>(
    mut file: MediaFile,
    source: R,
    chunk_size: usize,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static
where
    R: AsyncRead + Send + Unpin + 'static,
{
    async_stream::stream! {
        let mut reader = ReaderStream::with_capacity(source, chunk_size);
        let mut sent: u64 = 0;

        while let Some(chunk) = reader.next().await {
            match chunk {
                Ok(bytes) => {
                    sent += bytes.len() as u64;
                    yield Ok(bytes);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %file.path().display(),
                        sent,
                        "Read error while streaming attachment: {}",
                        e
                    );
                    drop(reader);
                    file.release();
                    yield Err(e);
                    return;
                }
            }
        }

        drop(reader);
        file.release();
        tracing::debug!(sent, "Attachment stream complete");
    }
}
