//! `{label},{target}` pair splitting and micro-grammar checks.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::UploadError;

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").unwrap());

static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:.+$").unwrap());

/// True when `target` starts with a URI scheme followed by a non-empty rest.
pub(crate) fn is_target(target: &str) -> bool {
    TARGET_RE.is_match(target)
}

/// Split one declaration into `(label, target)` at the first comma.
///
/// Labels never contain a comma; targets may.
pub fn split_pair(declaration: &str) -> Result<(&str, &str), UploadError> {
    let (label, target) = declaration.split_once(',').ok_or_else(|| {
        UploadError::syntax(
            declaration,
            "an upload declaration must be a pair \"{label},{URI}\"",
        )
    })?;

    if !LABEL_RE.is_match(label) {
        return Err(UploadError::syntax(
            label,
            "wrong uploaded item name syntax (expected [a-zA-Z][a-zA-Z0-9_]*)",
        ));
    }
    if !is_target(target) {
        return Err(UploadError::syntax(
            target,
            "bad URI syntax (expected \"<scheme>:...\" with <scheme> = [a-zA-Z][a-zA-Z0-9+.-]*)",
        ));
    }
    Ok((label, target))
}
