//! Extraction of DALI/TAP `UPLOAD` declarations from request parameters.
//!
//! The reserved parameter `UPLOAD` (any case) lists upload items as
//! `{label},{URI}`, where `{URI}` is `param:{name}` for a file submitted
//! inline in parameter `{name}`, or any other absolute URI for remote
//! content. DALI requires one item per submitted parameter; TAP also allows
//! several items in one value, separated by `;`.
//!
//! [`extract_uploads`] resolves every item, rewrites `UPLOAD` into a list of
//! [`UploadDescriptor`]s and deletes inline files nobody referenced.

mod decode;
mod pair;
mod resolve;
mod split;

pub use pair::split_pair;
pub use resolve::resolve_target;
pub use split::split_declarations;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UploadError;
use crate::params::{ParamValue, RequestParams, UploadFile};
use crate::upload::{FileManager, UploadDescriptor};

/// Canonical spelling of the reserved parameter. Matched case-insensitively.
pub const UPLOAD_PARAM: &str = "UPLOAD";

/// Accepted convention for listing several uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadSyntax {
    /// One declaration per `UPLOAD` parameter.
    Dali,
    /// Declarations may also be joined by `;` inside one value.
    #[default]
    Tap,
}

impl UploadSyntax {
    pub fn allows_multiple(self) -> bool {
        matches!(self, UploadSyntax::Tap)
    }
}

impl fmt::Display for UploadSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSyntax::Dali => f.write_str("dali"),
            UploadSyntax::Tap => f.write_str("tap"),
        }
    }
}

impl FromStr for UploadSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dali") {
            Ok(UploadSyntax::Dali)
        } else if s.eq_ignore_ascii_case("tap") {
            Ok(UploadSyntax::Tap)
        } else {
            Err(format!("unknown upload syntax \"{s}\" (expected \"dali\" or \"tap\")"))
        }
    }
}

/// Everything gathered from the `UPLOAD` entries before any mutation.
#[derive(Default)]
struct Gathered {
    uploads: Vec<UploadDescriptor>,
    /// Parameter names of inline files referenced by an upload.
    consumed: HashSet<String>,
    /// Inline files submitted directly under `UPLOAD`.
    stray: Vec<UploadFile>,
}

impl Gathered {
    fn push(&mut self, upload: UploadDescriptor) {
        if let Some(file) = upload.file() {
            self.consumed.insert(file.param_name.clone());
        }
        self.uploads.push(upload);
    }
}

/// Resolve all uploads declared in `params` and normalize the parameters.
///
/// On success, when at least one upload was found:
/// - every `UPLOAD` entry is replaced by a single `UPLOAD` list of
///   [`ParamValue::Upload`] items, in submission order;
/// - null values are dropped;
/// - inline files not referenced by any upload are deleted through `files`
///   (failures are logged and ignored) and removed from `params`.
///
/// `UPLOAD` entries yielding no upload are simply removed. Without any
/// `UPLOAD` entry, `params` is left untouched. On error, `params` is left
/// untouched and nothing is deleted.
///
/// Calling this again on its own output returns the same uploads.
pub fn extract_uploads(
    params: &mut RequestParams,
    syntax: UploadSyntax,
    files: &dyn FileManager,
) -> Result<Vec<UploadDescriptor>, UploadError> {
    let mut gathered = Gathered::default();
    let mut found = false;
    let view: &RequestParams = params;
    for (name, value) in view.iter() {
        if is_upload_param(name) {
            found = true;
            gather(value, view, syntax, &mut gathered)?;
        }
    }
    if !found {
        return Ok(Vec::new());
    }

    params.retain(|name, _| !is_upload_param(name));
    let Gathered {
        uploads,
        consumed,
        stray,
    } = gathered;
    if uploads.is_empty() {
        tracing::debug!("UPLOAD parameter present but declares no upload");
        if !stray.is_empty() {
            let names: Vec<&str> = stray.iter().map(|f| f.param_name.as_str()).collect();
            tracing::debug!(
                "dropped {} inline file(s) carried by UPLOAD without deleting them: {}",
                stray.len(),
                names.join(", ")
            );
        }
        return Ok(uploads);
    }

    for file in stray.iter().filter(|f| !consumed.contains(&f.param_name)) {
        discard_file(file, files);
    }
    remove_unreferenced_files(params, &consumed, files);

    params.insert(
        UPLOAD_PARAM,
        ParamValue::List(uploads.iter().cloned().map(ParamValue::Upload).collect()),
    );
    tracing::debug!(
        "extracted {} upload(s) ({} inline)",
        uploads.len(),
        uploads.iter().filter(|u| !u.is_by_reference()).count()
    );
    Ok(uploads)
}

fn is_upload_param(name: &str) -> bool {
    name.eq_ignore_ascii_case(UPLOAD_PARAM)
}

fn gather(
    value: &ParamValue,
    params: &RequestParams,
    syntax: UploadSyntax,
    gathered: &mut Gathered,
) -> Result<(), UploadError> {
    match value {
        ParamValue::Upload(upload) => gathered.push(upload.clone()),
        ParamValue::Text(raw) => {
            if raw.trim().is_empty() {
                return Ok(());
            }
            for declaration in split_declarations(raw, syntax)? {
                gathered.push(UploadDescriptor::parse(declaration, params)?);
            }
        }
        ParamValue::List(items) => {
            for item in items {
                gather(item, params, syntax, gathered)?;
            }
        }
        ParamValue::File(file) => gathered.stray.push(file.clone()),
        ParamValue::Null => {}
    }
    Ok(())
}

fn remove_unreferenced_files(
    params: &mut RequestParams,
    consumed: &HashSet<String>,
    files: &dyn FileManager,
) {
    *params = std::mem::take(params)
        .into_iter()
        .filter_map(|(name, value)| prune(value, consumed, files).map(|v| (name, v)))
        .collect();
}

/// Drop nulls and unreferenced inline files from `value`; `None` when
/// nothing is left.
fn prune(value: ParamValue, consumed: &HashSet<String>, files: &dyn FileManager) -> Option<ParamValue> {
    match value {
        ParamValue::Null => None,
        ParamValue::File(file) if !consumed.contains(&file.param_name) => {
            discard_file(&file, files);
            None
        }
        ParamValue::List(items) => {
            let kept: Vec<ParamValue> = items
                .into_iter()
                .filter_map(|item| prune(item, consumed, files))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(ParamValue::List(kept))
            }
        }
        other => Some(other),
    }
}

/// Best-effort deletion: the outcome is logged, never propagated.
fn discard_file(file: &UploadFile, files: &dyn FileManager) {
    match files.delete_upload(file) {
        Ok(()) => tracing::debug!(
            "deleted unreferenced upload \"{}\" at {}",
            file.param_name,
            file.location().display()
        ),
        Err(e) => tracing::warn!(
            "could not delete unreferenced upload \"{}\" at {}: {}",
            file.param_name,
            file.location().display(),
            e
        ),
    }
}
