//! `tapload check <value>...` – syntax-only validation of UPLOAD values.

use anyhow::{Context, Result};
use tapload_core::extract::{split_declarations, split_pair};
use tapload_core::UploadSyntax;

pub fn run_check(syntax: UploadSyntax, values: &[String]) -> Result<()> {
    for value in values {
        for line in check_value(syntax, value)? {
            println!("{line}");
        }
    }
    Ok(())
}

/// One `label -> target` line per declaration in `value`.
pub(crate) fn check_value(syntax: UploadSyntax, value: &str) -> Result<Vec<String>> {
    let declarations = split_declarations(value, syntax)
        .with_context(|| format!("invalid UPLOAD value for the {syntax} syntax"))?;
    declarations
        .into_iter()
        .map(|declaration| -> Result<String> {
            let (label, target) = split_pair(declaration)?;
            Ok(format!("{label} -> {target}"))
        })
        .collect()
}
