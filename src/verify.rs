//! Checksum computation for downloaded packages.
//!
//! The digest is computed in a second pass over the file on disk, fully
//! independent of the download stream, so the two concerns can be tested
//! in isolation and a short write cannot slip past verification.

use crate::digest::Sha512Digest;
use sha2::{Digest, Sha512};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Fixed chunk size for the verification pass.
const CHUNK_SIZE: usize = 8192;

/// Compute the SHA-512 digest of the file at `path`.
///
/// Reads the file in fixed-size chunks and returns the lowercase hex
/// digest as a validated [`Sha512Digest`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_sha512(path: &Path) -> io::Result<Sha512Digest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha512::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    let hex = format!("{:x}", hasher.finalize());
    // sha2 always emits 128 lowercase hex characters.
    Sha512Digest::try_from(hex).map_err(io::Error::other)
}
