//! Inline file staged by the upstream request parser.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Handle to the content of a request parameter submitted inline and already
/// written to temporary storage.
///
/// The backing file stays owned by the request until an accepted declaration
/// references it; unreferenced handles are deleted by the extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name of the request parameter that carried the content.
    pub param_name: String,
    /// Where the content was staged.
    pub location: PathBuf,
    /// File name announced by the client, if any.
    pub file_name: Option<String>,
    /// MIME type announced by the client, if any.
    pub mime_type: Option<String>,
    /// Size in bytes, if known at staging time.
    pub length: Option<u64>,
}

impl UploadFile {
    pub fn new(param_name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            param_name: param_name.into(),
            location: location.into(),
            file_name: None,
            mime_type: None,
            length: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Open the staged content for reading.
    pub fn open(&self) -> io::Result<File> {
        File::open(&self.location)
    }
}
