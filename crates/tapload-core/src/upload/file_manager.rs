//! Access to upload content outside the parameter set: remote URIs and the
//! storage backing staged inline files.

use std::fs;
use std::io::{self, Read};

use thiserror::Error;
use url::Url;

use crate::params::UploadFile;

/// Failure to open the content of an upload.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("unsupported URI scheme: \"{0}\"")]
    UnsupportedScheme(String),

    #[error("cannot open upload content: {0}")]
    Io(#[from] io::Error),
}

/// Storage collaborator used by the extraction pass and by descriptors.
pub trait FileManager {
    /// Open a stream on a by-reference upload.
    fn open_uri(&self, uri: &Url) -> Result<Box<dyn Read>, OpenError>;

    /// Delete the storage backing a staged inline file.
    fn delete_upload(&self, file: &UploadFile) -> io::Result<()>;
}

/// Deletes staged files from the local filesystem. Remote content is never
/// fetched here, so every URI is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileManager;

impl FileManager for LocalFileManager {
    fn open_uri(&self, uri: &Url) -> Result<Box<dyn Read>, OpenError> {
        Err(OpenError::UnsupportedScheme(uri.scheme().to_string()))
    }

    fn delete_upload(&self, file: &UploadFile) -> io::Result<()> {
        fs::remove_file(file.location())
    }
}

/// Leaves staged files in place (dry runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepFiles;

impl FileManager for KeepFiles {
    fn open_uri(&self, uri: &Url) -> Result<Box<dyn Read>, OpenError> {
        Err(OpenError::UnsupportedScheme(uri.scheme().to_string()))
    }

    fn delete_upload(&self, file: &UploadFile) -> io::Result<()> {
        tracing::debug!("keeping staged file {}", file.location().display());
        Ok(())
    }
}
