pub mod config;
pub mod logging;

pub mod checksum;
pub mod error;
pub mod extract;
pub mod params;
pub mod upload;

pub use error::{UploadError, UploadErrorKind};
pub use extract::{extract_uploads, UploadSyntax, UPLOAD_PARAM};
pub use params::{ParamValue, RequestParams, UploadFile};
pub use upload::{FileManager, KeepFiles, LocalFileManager, OpenError, UploadDescriptor, UploadTarget};
