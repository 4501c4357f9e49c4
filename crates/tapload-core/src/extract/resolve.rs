//! Resolution of a declaration target into an [`UploadDescriptor`].

use url::Url;

use super::decode::percent_decode;
use super::pair::is_target;
use crate::error::UploadError;
use crate::params::{ParamValue, RequestParams, UploadFile};
use crate::upload::UploadDescriptor;

/// Prefix of a target referencing an inline file parameter.
const PARAM_PREFIX: &str = "param:";

/// Resolve `target` against `params`.
///
/// - `param:{name}` (prefix matched case-insensitively) binds the inline
///   file held by parameter `{name}`; when that parameter holds several
///   values, the last inline file among them wins.
/// - Anything else must be `{scheme}:{rest}` with a scheme other than
///   `file`; it is percent-decoded (UTF-8) and parsed as an absolute URI.
///
/// Without a label, the descriptor falls back to the parameter name or the
/// URI text.
pub fn resolve_target(
    label: Option<&str>,
    target: &str,
    params: &RequestParams,
) -> Result<UploadDescriptor, UploadError> {
    if let Some(name) = strip_param_prefix(target) {
        let file = find_staged_file(name, params)?;
        return Ok(UploadDescriptor::from_file(label, file.clone()));
    }

    let uri = target.trim();
    if !is_target(uri) {
        return Err(UploadError::syntax(uri, "bad URI syntax"));
    }
    if let Some((scheme, _)) = uri.split_once(':') {
        if scheme.eq_ignore_ascii_case("file") {
            return Err(UploadError::ForbiddenScheme {
                label: label.unwrap_or(uri).to_string(),
                scheme: "file".to_string(),
            });
        }
    }

    let decoded = percent_decode(uri);
    let parsed = Url::parse(&decoded)
        .map_err(|e| UploadError::syntax(decoded.as_str(), format!("incorrect URI syntax ({e})")))?;
    UploadDescriptor::from_uri(label, parsed)
}

fn strip_param_prefix(target: &str) -> Option<&str> {
    let head = target.get(..PARAM_PREFIX.len())?;
    if head.eq_ignore_ascii_case(PARAM_PREFIX) {
        Some(&target[PARAM_PREFIX.len()..])
    } else {
        None
    }
}

fn find_staged_file<'a>(name: &str, params: &'a RequestParams) -> Result<&'a UploadFile, UploadError> {
    let missing = || UploadError::MissingReference {
        name: name.to_string(),
    };
    match params.get(name) {
        None | Some(ParamValue::Null) => Err(missing()),
        Some(ParamValue::File(file)) => Ok(file),
        Some(ParamValue::List(items)) => items.iter().rev().find_map(ParamValue::as_file).ok_or_else(missing),
        Some(ParamValue::Text(_) | ParamValue::Upload(_)) => Err(UploadError::TypeMismatch {
            name: name.to_string(),
        }),
    }
}
