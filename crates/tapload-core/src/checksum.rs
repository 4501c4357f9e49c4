//! SHA-256 digest of upload content.
//!
//! Computed on demand from an opened upload stream, never during extraction.

use sha2::{Digest, Sha256};
use std::io::{self, Read};

const BUF_SIZE: usize = 64 * 1024;

/// Size and SHA-256 digest (lowercase hex) of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    pub length: u64,
    pub sha256: String,
}

/// Read `reader` to the end in chunks and digest it.
pub fn sha256_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<ContentDigest> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    let mut length = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        length += n as u64;
    }
    Ok(ContentDigest {
        length,
        sha256: hex::encode(hasher.finalize()),
    })
}
