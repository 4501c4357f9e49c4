//! Errors raised while extracting UPLOAD declarations.
//!
//! Every variant is a caller input error: none is retried and all map to a
//! single "bad request" status at the protocol boundary.

use thiserror::Error;

/// Failure to recognize, validate or resolve an upload declaration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Malformed declaration, label, target or multi-declaration value.
    #[error("{message}: \"{input}\"")]
    Syntax { input: String, message: String },

    /// `param:{name}` names a parameter absent from the request.
    #[error("missing file parameter to upload: \"{name}\"")]
    MissingReference { name: String },

    /// `param:{name}` names a parameter that is not an inline file.
    #[error("incorrect parameter type \"{name}\": a file was expected")]
    TypeMismatch { name: String },

    /// Scheme `file` used anywhere, or `param` outside the inline-reference position.
    #[error("wrong URI scheme in upload \"{label}\": \"{scheme}\" is forbidden")]
    ForbiddenScheme { label: String, scheme: String },
}

/// Discriminant of [`UploadError`], convenient for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    Syntax,
    MissingReference,
    TypeMismatch,
    ForbiddenScheme,
}

impl UploadError {
    pub(crate) fn syntax(input: impl Into<String>, message: impl Into<String>) -> Self {
        UploadError::Syntax {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> UploadErrorKind {
        match self {
            UploadError::Syntax { .. } => UploadErrorKind::Syntax,
            UploadError::MissingReference { .. } => UploadErrorKind::MissingReference,
            UploadError::TypeMismatch { .. } => UploadErrorKind::TypeMismatch,
            UploadError::ForbiddenScheme { .. } => UploadErrorKind::ForbiddenScheme,
        }
    }

    /// HTTP status to report to the client. Always 400 (Bad Request).
    pub fn http_status(&self) -> u16 {
        400
    }
}
