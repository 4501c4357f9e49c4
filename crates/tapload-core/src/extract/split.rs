//! Splitting a raw UPLOAD value into individual declarations.
//!
//! With the TAP syntax, several declarations may share one value, joined by
//! `;`. A URI may legally contain `;` too, so the value is peeled from the
//! right: the longest prefix that still leaves a complete trailing
//! declaration is split off first. Inputs whose URIs embed `;` followed by
//! something shaped like `{x},{y}` are inherently ambiguous and will be
//! split there; clients should percent-encode `;` (`%3B`) or use the DALI
//! syntax.
//!
//! With the DALI syntax a `;` may appear anywhere in a URI, except directly
//! before something that is itself a well-formed `{label},{scheme}:` item:
//! such a value is a TAP-style list and is refused.

use std::sync::LazyLock;

use regex::Regex;

use super::UploadSyntax;
use crate::error::UploadError;

static SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^,]+,.+$").unwrap());

static MULTI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,]+,.+);([^,]+,.+)$").unwrap());

static JOINED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";[a-zA-Z][a-zA-Z0-9_]*,[a-zA-Z][a-zA-Z0-9+.\-]*:.").unwrap());

/// Split `raw` into declaration strings, in submission order.
pub fn split_declarations(raw: &str, syntax: UploadSyntax) -> Result<Vec<&str>, UploadError> {
    let mut rest = raw;
    let mut peeled = Vec::new();

    if syntax.allows_multiple() {
        while let Some(caps) = MULTI_RE.captures(rest) {
            let (Some(head), Some(last)) = (caps.get(1), caps.get(2)) else {
                break;
            };
            peeled.push(last.as_str());
            rest = head.as_str();
        }
    } else if JOINED_ITEM_RE.is_match(raw) {
        return Err(UploadError::syntax(
            raw,
            "several uploads in one UPLOAD parameter are not allowed with the DALI syntax",
        ));
    }

    if !SINGLE_RE.is_match(rest) {
        return Err(UploadError::syntax(
            raw,
            "wrong DALI syntax for the parameter UPLOAD",
        ));
    }
    peeled.push(rest);
    peeled.reverse();
    Ok(peeled)
}
