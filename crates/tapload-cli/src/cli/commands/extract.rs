//! `tapload extract` – stage inline files, extract uploads, report the result.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tapload_core::checksum::sha256_reader;
use tapload_core::config::TaploadConfig;
use tapload_core::{
    extract_uploads, FileManager, KeepFiles, LocalFileManager, RequestParams, UploadDescriptor,
    UploadFile, UploadSyntax, UploadTarget,
};

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub syntax: UploadSyntax,
    pub params: Vec<(String, String)>,
    pub files: Vec<(String, String)>,
    pub digest: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadReport {
    label: String,
    target: String,
    by_reference: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtractReport {
    syntax: String,
    uploads: Vec<UploadReport>,
    remaining_params: Vec<String>,
}

pub fn run_extract(cfg: &TaploadConfig, opts: &ExtractOptions) -> Result<()> {
    let staging_root: PathBuf = match &cfg.staging_dir {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
            dir.clone()
        }
        None => std::env::temp_dir(),
    };

    let files: &dyn FileManager = if cfg.delete_unreferenced {
        &LocalFileManager
    } else {
        &KeepFiles
    };
    let report = extract_report(opts, &staging_root, files)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Build the request, run the extraction and describe the outcome.
///
/// Inline files are staged in a per-request directory under `staging_root`
/// that is removed when this returns, whether extraction succeeded or not.
pub(crate) fn extract_report(
    opts: &ExtractOptions,
    staging_root: &Path,
    files: &dyn FileManager,
) -> Result<ExtractReport> {
    let staging = tempfile::Builder::new()
        .prefix("request-")
        .tempdir_in(staging_root)
        .with_context(|| format!("create staging directory in {}", staging_root.display()))?;

    let mut request = RequestParams::new();
    for (name, value) in &opts.params {
        request.append(name.as_str(), value.as_str());
    }
    for (name, path) in &opts.files {
        let staged = stage_file(staging.path(), name, Path::new(path))?;
        request.append(name.as_str(), staged);
    }

    let uploads = extract_uploads(&mut request, opts.syntax, files)?;
    tracing::info!("extracted {} upload(s) with the {} syntax", uploads.len(), opts.syntax);

    let uploads = uploads
        .iter()
        .map(|u| upload_report(u, opts.digest, files))
        .collect::<Result<Vec<_>>>()?;
    Ok(ExtractReport {
        syntax: opts.syntax.to_string(),
        uploads,
        remaining_params: request.keys().map(str::to_string).collect(),
    })
}

/// Copy `source` into `staging_dir` the way a request parser would stage an
/// inline file.
fn stage_file(staging_dir: &Path, name: &str, source: &Path) -> Result<UploadFile> {
    let (_, dest) = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".bin")
        .tempfile_in(staging_dir)
        .with_context(|| format!("stage parameter {name}"))?
        .keep()?;
    let length = fs::copy(source, &dest).with_context(|| format!("copy {}", source.display()))?;
    tracing::debug!("staged {} as {}", source.display(), dest.display());

    let mut file = UploadFile::new(name, dest).with_length(length);
    if let Some(file_name) = source.file_name().and_then(|n| n.to_str()) {
        file = file.with_file_name(file_name);
    }
    if let Some(mime) = mime_guess::from_path(source).first() {
        file = file.with_mime_type(mime.essence_str());
    }
    Ok(file)
}

fn upload_report(upload: &UploadDescriptor, digest: bool, files: &dyn FileManager) -> Result<UploadReport> {
    let target = match upload.target() {
        UploadTarget::Remote(uri) => uri.to_string(),
        UploadTarget::Inline(file) => format!("param:{}", file.param_name),
    };
    let mut report = UploadReport {
        label: upload.label().to_string(),
        target,
        by_reference: upload.is_by_reference(),
        file_name: upload.file().and_then(|f| f.file_name.clone()),
        mime_type: upload.file().and_then(|f| f.mime_type.clone()),
        length: upload.file().and_then(|f| f.length),
        sha256: None,
    };
    if digest && !upload.is_by_reference() {
        let mut stream = upload
            .open(files)
            .with_context(|| format!("open upload {}", upload.label()))?;
        let d = sha256_reader(&mut stream)?;
        report.length = Some(d.length);
        report.sha256 = Some(d.sha256);
    }
    Ok(report)
}

fn print_report(report: &ExtractReport) {
    println!("{} upload(s) ({} syntax)", report.uploads.len(), report.syntax);
    for u in &report.uploads {
        let kind = if u.by_reference { "remote" } else { "inline" };
        println!("  {} [{}] {}", u.label, kind, u.target);
        if let Some(name) = &u.file_name {
            println!("    file {} ({})", name, u.mime_type.as_deref().unwrap_or("unknown type"));
        }
        if let Some(sha) = &u.sha256 {
            println!("    {} bytes, sha256 {}", u.length.unwrap_or(0), sha);
        }
    }
    println!("remaining parameters: {}", report.remaining_params.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(params: &[(&str, &str)], files: &[(&str, &Path)], syntax: UploadSyntax) -> ExtractOptions {
        ExtractOptions {
            syntax,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files
                .iter()
                .map(|(k, p)| (k.to_string(), p.display().to_string()))
                .collect(),
            digest: true,
            json: false,
        }
    }

    #[test]
    fn stages_copies_and_reports_uploads() {
        let src_dir = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let table = src_dir.path().join("table.csv");
        let other = src_dir.path().join("other.csv");
        fs::write(&table, b"abc").unwrap();
        fs::write(&other, b"unused").unwrap();

        let o = opts(
            &[("QUERY", "SELECT 1"), ("UPLOAD", "t1,param:tbl;t2,http://example.com/x")],
            &[("tbl", table.as_path()), ("extra", other.as_path())],
            UploadSyntax::Tap,
        );
        let report = extract_report(&o, staging.path(), &LocalFileManager).unwrap();

        assert_eq!(report.uploads.len(), 2);
        assert_eq!(report.uploads[0].target, "param:tbl");
        assert_eq!(report.uploads[0].file_name.as_deref(), Some("table.csv"));
        assert_eq!(report.uploads[0].mime_type.as_deref(), Some("text/csv"));
        assert_eq!(report.uploads[0].length, Some(3));
        assert_eq!(
            report.uploads[0].sha256.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert!(report.uploads[1].by_reference);
        assert!(report.uploads[1].sha256.is_none());
        assert_eq!(report.remaining_params, vec!["QUERY", "tbl", "UPLOAD"]);

        // Sources are never touched and no staged copy outlives the request.
        assert!(table.exists() && other.exists());
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn keep_files_dry_run_keeps_unreferenced_params() {
        let src_dir = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let other = src_dir.path().join("other.csv");
        fs::write(&other, b"unused").unwrap();

        let o = opts(
            &[("UPLOAD", "t,ivo://example.org/t")],
            &[("extra", other.as_path())],
            UploadSyntax::Dali,
        );
        let report = extract_report(&o, staging.path(), &KeepFiles).unwrap();
        assert_eq!(report.uploads.len(), 1);
        assert_eq!(report.remaining_params, vec!["UPLOAD"]);
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn rejected_request_leaves_staging_dir_empty() {
        let src_dir = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let other = src_dir.path().join("other.csv");
        fs::write(&other, b"unused").unwrap();

        let o = opts(
            &[("UPLOAD", "t,file:/etc/passwd")],
            &[("extra", other.as_path())],
            UploadSyntax::Tap,
        );
        let err = extract_report(&o, staging.path(), &LocalFileManager).unwrap_err();
        assert!(err.to_string().contains("forbidden"));
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
        assert!(other.exists());
    }
}
