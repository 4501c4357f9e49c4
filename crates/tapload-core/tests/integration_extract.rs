//! Integration test: staged inline files on disk, extraction with the local
//! file manager, and reading the resulting uploads back.

use std::fs;
use std::io::Read;
use std::path::Path;

use tapload_core::checksum::sha256_reader;
use tapload_core::{
    extract_uploads, LocalFileManager, ParamValue, RequestParams, UploadErrorKind, UploadFile,
    UploadSyntax, UPLOAD_PARAM,
};
use tempfile::tempdir;

fn stage(dir: &Path, param: &str, body: &[u8]) -> UploadFile {
    let path = dir.join(format!("{param}.upload"));
    fs::write(&path, body).unwrap();
    UploadFile::new(param, path)
        .with_file_name(format!("{param}.xml"))
        .with_length(body.len() as u64)
}

#[test]
fn referenced_files_survive_and_unreferenced_are_deleted() {
    let staging = tempdir().unwrap();
    let votable = stage(staging.path(), "votable", b"<VOTABLE version=\"1.3\"/>");
    let unused = stage(staging.path(), "unused", b"never referenced");
    let unused_path = unused.location.clone();

    let mut params = RequestParams::new();
    params.insert("REQUEST", "doQuery");
    params.insert("LANG", "ADQL");
    params.insert("upload", "t1,param:votable;t2,http://example.com/cat.xml");
    params.insert("votable", votable.clone());
    params.insert("unused", unused);

    let uploads = extract_uploads(&mut params, UploadSyntax::Tap, &LocalFileManager).unwrap();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].to_string(), "t1,param:votable");
    assert_eq!(uploads[1].to_string(), "t2,http://example.com/cat.xml");

    assert!(votable.location.exists(), "referenced file must be kept");
    assert!(!unused_path.exists(), "unreferenced file must be deleted");
    assert!(!params.contains_key("unused"));
    assert_eq!(
        params.keys().collect::<Vec<_>>(),
        vec!["REQUEST", "LANG", "votable", UPLOAD_PARAM]
    );

    let mut content = String::new();
    uploads[0]
        .open(&LocalFileManager)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "<VOTABLE version=\"1.3\"/>");
    assert!(uploads[1].open(&LocalFileManager).is_err());
}

#[test]
fn already_deleted_file_does_not_fail_extraction() {
    let staging = tempdir().unwrap();
    let ghost = stage(staging.path(), "ghost", b"x");
    fs::remove_file(&ghost.location).unwrap();

    let mut params = RequestParams::new();
    params.insert("UPLOAD", "t,ivo://example.org/tables/t");
    params.insert("ghost", ghost);

    let uploads = extract_uploads(&mut params, UploadSyntax::Dali, &LocalFileManager).unwrap();
    assert_eq!(uploads.len(), 1);
    assert!(!params.contains_key("ghost"));
}

#[test]
fn rejected_request_keeps_every_staged_file() {
    let staging = tempdir().unwrap();
    let a = stage(staging.path(), "a", b"a");
    let b = stage(staging.path(), "b", b"b");

    let mut params = RequestParams::new();
    params.insert("UPLOAD", "t1,param:a;t2,file:///etc/passwd");
    params.insert("a", a.clone());
    params.insert("b", b.clone());
    let before = params.clone();

    let err = extract_uploads(&mut params, UploadSyntax::Tap, &LocalFileManager).unwrap_err();
    assert_eq!(err.kind(), UploadErrorKind::ForbiddenScheme);
    assert_eq!(err.http_status(), 400);
    assert_eq!(params, before);
    assert!(a.location.exists());
    assert!(b.location.exists());
}

#[test]
fn digest_of_inline_upload_after_extraction() {
    let staging = tempdir().unwrap();
    let file = stage(staging.path(), "data", b"abc");

    let mut params = RequestParams::new();
    params.append("UPLOAD", "t,param:data");
    params.append("UPLOAD", ParamValue::Null);
    params.insert("data", file);

    let uploads = extract_uploads(&mut params, UploadSyntax::Dali, &LocalFileManager).unwrap();
    let mut stream = uploads[0].open(&LocalFileManager).unwrap();
    let digest = sha256_reader(&mut stream).unwrap();
    assert_eq!(digest.length, 3);
    assert_eq!(
        digest.sha256,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
