//! BLAKE3 hashing utilities for content integrity

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{BundleError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| BundleError::IoError {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| BundleError::IoError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Calculate BLAKE3 hash of an in-memory buffer
pub fn hash_bytes(content: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, blake3::hash(content).to_hex())
}

/// Verify a hash matches the expected value
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    // Normalize both hashes (ensure prefix)
    let normalize = |h: &str| {
        if h.starts_with(HASH_PREFIX) {
            h.to_string()
        } else {
            format!("{}{}", HASH_PREFIX, h)
        }
    };

    normalize(expected) == normalize(actual)
}

/// Whether the file at `path` has content hash `expected`; unreadable files never match
pub fn file_matches(path: &Path, expected: &str) -> bool {
    hash_file(path).is_ok_and(|actual| verify_hash(expected, &actual))
}
