//! File upload module
//!
//! An upload is driven by an [`UploadTransfer`], which owns the destination
//! file from the moment it is created. The transfer moves
//! `Idle -> Active -> {Done | Aborted}`; a transfer that is dropped while
//! still `Active` (client gone, task cancelled) removes its partial file, so
//! only a body that was fully received under the limit is left on disk.

use std::fmt::Display;
use std::io;
use std::path::PathBuf;
use std::pin::pin;

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{HeaderMap, Response};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger;
use crate::storage::{FileStore, Filename, StoreError};

/// Why an upload did not complete
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },
    #[error("file already exists")]
    Conflict,
    #[error("request body interrupted: {0}")]
    Interrupted(String),
    #[error(transparent)]
    Storage(StoreError),
}

impl UploadError {
    fn to_response(&self) -> Response<ResponseBody> {
        match self {
            Self::TooLarge { .. } => http::build_413_response(),
            Self::Conflict => http::build_409_response(),
            Self::Interrupted(_) => http::build_400_close_response("Bad request"),
            Self::Storage(_) => http::build_500_response(),
        }
    }
}

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        Self::Storage(StoreError::Io(err))
    }
}

/// Lifecycle of a single upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Destination not created yet
    Idle,
    /// Destination created and owned by this transfer
    Active,
    /// Body fully written, file kept
    Done,
    /// Stopped early, file removed
    Aborted,
}

/// Per-upload state: destination, bytes written so far and the size guard
#[derive(Debug)]
pub struct UploadTransfer {
    path: PathBuf,
    file: Option<File>,
    written: u64,
    limit: u64,
    state: TransferState,
}

impl UploadTransfer {
    pub fn new(path: PathBuf, limit: u64) -> Self {
        Self {
            path,
            file: None,
            written: 0,
            limit,
            state: TransferState::Idle,
        }
    }

    pub const fn state(&self) -> TransferState {
        self.state
    }

    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Create the destination; fails with `Conflict` without touching an existing file
    pub async fn open(&mut self, store: &FileStore, name: &Filename) -> Result<(), UploadError> {
        debug_assert_eq!(self.state, TransferState::Idle);
        let file = store.create_new(name).await.map_err(|e| match e {
            StoreError::AlreadyExists => UploadError::Conflict,
            other => UploadError::Storage(other),
        })?;
        self.file = Some(file);
        self.state = TransferState::Active;
        Ok(())
    }

    /// Append one chunk, refusing it if the running total would pass the limit
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        let total = self.written + chunk.len() as u64;
        if total > self.limit {
            return Err(UploadError::TooLarge { limit: self.limit });
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("upload destination is not open"))?;
        file.write_all(chunk).await?;
        self.written = total;
        Ok(())
    }

    /// Flush and close the destination, keeping the file
    pub async fn finish(&mut self) -> Result<u64, UploadError> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        self.state = TransferState::Done;
        Ok(self.written)
    }

    /// Close and remove the partial destination
    pub async fn abort(&mut self) {
        if self.state != TransferState::Active {
            return;
        }
        self.state = TransferState::Aborted;
        drop(self.file.take());
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            log_cleanup_failure(&self.path, &e);
        }
    }
}

impl Drop for UploadTransfer {
    fn drop(&mut self) {
        if self.state != TransferState::Active {
            return;
        }
        drop(self.file.take());
        if let Err(e) = std::fs::remove_file(&self.path) {
            log_cleanup_failure(&self.path, &e);
        }
        logger::log_warning(&format!(
            "Upload to '{}' cancelled after {} bytes, partial file removed",
            self.path.display(),
            self.written
        ));
    }
}

fn log_cleanup_failure(path: &std::path::Path, err: &io::Error) {
    if err.kind() != io::ErrorKind::NotFound {
        logger::log_error(&format!(
            "Failed to remove partial upload '{}': {err}",
            path.display()
        ));
    }
}

/// Declared request body length, if present and well-formed
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Serve a POST request
pub async fn receive<B>(
    name: &Filename,
    headers: &HeaderMap,
    body: B,
    state: &AppState,
) -> Response<ResponseBody>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let limit = state.transfer_limit();
    if let Some(declared) = declared_length(headers).filter(|&len| len > limit) {
        logger::log_warning(&format!(
            "Rejected upload of '{name}': declared {declared} bytes (max: {limit})"
        ));
        return http::build_413_response();
    }

    let mut transfer = UploadTransfer::new(state.store.path_of(name), limit);
    match run(&mut transfer, &state.store, name, body).await {
        Ok(size) => {
            logger::log_debug(&format!("Stored '{name}' ({size} bytes)"));
            http::build_200_response("File upload completed")
        }
        Err(e) => {
            transfer.abort().await;
            match &e {
                UploadError::Conflict => logger::log_debug(&format!("Upload of '{name}': {e}")),
                UploadError::Storage(_) => {
                    logger::log_error(&format!("Upload of '{name}' failed: {e}"));
                }
                UploadError::TooLarge { .. } | UploadError::Interrupted(_) => {
                    logger::log_warning(&format!(
                        "Upload of '{name}' aborted after {} bytes: {e}",
                        transfer.written()
                    ));
                }
            }
            e.to_response()
        }
    }
}

async fn run<B>(
    transfer: &mut UploadTransfer,
    store: &FileStore,
    name: &Filename,
    body: B,
) -> Result<u64, UploadError>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    transfer.open(store, name).await?;

    let mut body = pin!(body);
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| UploadError::Interrupted(e.to_string()))?;
        if let Ok(chunk) = frame.into_data() {
            transfer.write_chunk(&chunk).await?;
        }
    }

    transfer.finish().await
}
