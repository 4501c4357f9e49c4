//! Resolved upload items.
//!
//! An [`UploadDescriptor`] pairs a label with exactly one content source:
//! a staged inline file or a remote URI. It renders back to the DALI text
//! form `{label},param:{name}` or `{label},{uri}`.

mod file_manager;

pub use file_manager::{FileManager, KeepFiles, LocalFileManager, OpenError};

use std::fmt;
use std::io::Read;

use url::Url;

use crate::error::UploadError;
use crate::extract;
use crate::params::{RequestParams, UploadFile};

/// Where the content of an upload lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// Submitted inline and staged by the request parser.
    Inline(UploadFile),
    /// Accessed later through the URI.
    Remote(Url),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    label: String,
    target: UploadTarget,
}

impl UploadDescriptor {
    /// Upload of a staged inline file. Without a label, the name of the
    /// parameter that carried the file is used.
    pub fn from_file(label: Option<&str>, file: UploadFile) -> Self {
        let label = label.map_or_else(|| file.param_name.clone(), str::to_string);
        Self {
            label,
            target: UploadTarget::Inline(file),
        }
    }

    /// Upload of remote content. Without a label, the URI text is used.
    ///
    /// The schemes `param` (reserved for inline references) and `file` are
    /// rejected.
    pub fn from_uri(label: Option<&str>, uri: Url) -> Result<Self, UploadError> {
        let label = label.map_or_else(|| uri.as_str().to_string(), str::to_string);
        if uri.scheme() == "param" || uri.scheme() == "file" {
            return Err(UploadError::ForbiddenScheme {
                label,
                scheme: uri.scheme().to_string(),
            });
        }
        Ok(Self {
            label,
            target: UploadTarget::Remote(uri),
        })
    }

    /// Parse a single `{label},{target}` declaration against `params`.
    pub fn parse(declaration: &str, params: &RequestParams) -> Result<Self, UploadError> {
        let (label, target) = extract::split_pair(declaration)?;
        extract::resolve_target(Some(label), target, params)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &UploadTarget {
        &self.target
    }

    pub fn file(&self) -> Option<&UploadFile> {
        match &self.target {
            UploadTarget::Inline(f) => Some(f),
            UploadTarget::Remote(_) => None,
        }
    }

    pub fn uri(&self) -> Option<&Url> {
        match &self.target {
            UploadTarget::Inline(_) => None,
            UploadTarget::Remote(u) => Some(u),
        }
    }

    /// True when the content is remote and only reachable through its URI.
    pub fn is_by_reference(&self) -> bool {
        self.file().is_none()
    }

    /// Open a stream on the content. Remote content goes through `files`.
    pub fn open(&self, files: &dyn FileManager) -> Result<Box<dyn Read>, OpenError> {
        match &self.target {
            UploadTarget::Inline(f) => Ok(Box::new(f.open()?)),
            UploadTarget::Remote(u) => files.open_uri(u),
        }
    }
}

impl fmt::Display for UploadDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            UploadTarget::Inline(file) => write!(f, "{},param:{}", self.label, file.param_name),
            UploadTarget::Remote(uri) => write!(f, "{},{}", self.label, uri),
        }
    }
}
