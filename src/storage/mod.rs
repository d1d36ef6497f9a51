//! Filesystem adapter
//!
//! Flat file store over two directories: the files root, holding uploaded
//! files, and the public root, holding the index document. Every fault is
//! surfaced as one of three kinds so callers can map it to a status code
//! without inspecting `io::Error` themselves.
//!
//! Upload safety rests on [`FileStore::create_new`]: the open fails
//! atomically when the target already exists, so two concurrent uploads of
//! the same name can never both write it.

mod filename;

pub use filename::Filename;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::sync::oneshot;

/// Classified filesystem fault
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found")]
    NotFound,
    #[error("file already exists")]
    AlreadyExists,
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            _ => Self::Io(err),
        }
    }
}

/// An opened regular file ready to be streamed
#[derive(Debug)]
pub struct OpenedFile {
    pub file: File,
    pub len: u64,
}

/// Flat file store rooted at two directories
#[derive(Debug, Clone)]
pub struct FileStore {
    files_root: PathBuf,
    public_root: PathBuf,
}

impl FileStore {
    pub fn new(files_root: impl Into<PathBuf>, public_root: impl Into<PathBuf>) -> Self {
        Self {
            files_root: files_root.into(),
            public_root: public_root.into(),
        }
    }

    /// Absolute location of a stored file
    pub fn path_of(&self, name: &Filename) -> PathBuf {
        self.files_root.join(name)
    }

    /// Create both roots if they are missing
    pub async fn ensure_roots(&self) -> io::Result<()> {
        fs::create_dir_all(&self.files_root).await?;
        fs::create_dir_all(&self.public_root).await
    }

    /// Open a stored file for reading
    pub async fn open(&self, name: &Filename) -> Result<OpenedFile, StoreError> {
        open_regular(&self.path_of(name)).await
    }

    /// Open a document from the public root for reading
    pub async fn open_public(&self, name: &str) -> Result<OpenedFile, StoreError> {
        open_regular(&self.public_root.join(name)).await
    }

    /// Create a stored file, failing with `AlreadyExists` if the name is taken
    ///
    /// The open runs on the blocking pool. If the caller is dropped before it
    /// receives the handle, the file created on its behalf is removed again.
    pub async fn create_new(&self, name: &Filename) -> Result<File, StoreError> {
        let path = self.path_of(name);
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let created = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .map(|file| Created::new(path, file));
            // On a closed channel the returned value is dropped here
            drop(tx.send(created));
        });

        let created = rx
            .await
            .map_err(|_| io::Error::other("file creation task was cancelled"))??;
        Ok(File::from_std(created.claim()?))
    }

    /// Delete a stored file
    pub async fn remove(&self, name: &Filename) -> Result<(), StoreError> {
        fs::remove_file(self.path_of(name)).await?;
        Ok(())
    }
}

/// A file just created by [`FileStore::create_new`]
///
/// Removed on drop unless claimed, so a handle that never reaches its caller
/// does not leave an empty file behind.
#[derive(Debug)]
struct Created {
    path: PathBuf,
    file: Option<std::fs::File>,
}

impl Created {
    fn new(path: PathBuf, file: std::fs::File) -> Self {
        Self {
            path,
            file: Some(file),
        }
    }

    fn claim(mut self) -> io::Result<std::fs::File> {
        self.file
            .take()
            .ok_or_else(|| io::Error::other("created file already claimed"))
    }
}

impl Drop for Created {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            // Nothing to report to: the request that wanted this file is gone
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

async fn open_regular(path: &Path) -> Result<OpenedFile, StoreError> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(StoreError::Io(io::Error::other(format!(
            "'{}' is not a regular file",
            path.display()
        ))));
    }
    Ok(OpenedFile {
        file,
        len: metadata.len(),
    })
}
