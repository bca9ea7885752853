//! crates/sponge/src/file.rs
//!
//! Whole-file digests streamed through a reusable read buffer.

use std::fs::File;
use std::io;
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::algorithm::Algorithm;
use crate::hasher::Hasher;
use crate::permutation::KeccakPermutation;

/// Size of the read buffer used by [`digest_file`].
pub const DEFAULT_READ_BUFFER_LEN: usize = 2 * 1024 * 1024;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Renders `bytes` as lowercase hexadecimal.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut rendered = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        rendered.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        rendered.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
    }
    rendered
}

/// Digest of a file together with the number of bytes read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileDigest {
    /// Digest bytes.
    pub digest: Vec<u8>,
    /// Number of bytes consumed from the file.
    pub bytes_read: u64,
}

impl FileDigest {
    /// Lowercase hexadecimal rendering of the digest.
    pub fn to_hex(&self) -> String {
        to_hex(&self.digest)
    }
}

/// Hashes the file at `path` with `algorithm` using the process-wide backend.
///
/// # Errors
///
/// Propagates failures to open or read the file. A backend that cannot be
/// initialized is reported as an [`io::ErrorKind::Other`] error wrapping
/// [`crate::SpongeError::Initialization`].
pub fn digest_file<P: AsRef<Path>>(path: P, algorithm: Algorithm) -> io::Result<FileDigest> {
    let hasher = Hasher::try_new(algorithm)?;
    let mut buffer = vec![0u8; DEFAULT_READ_BUFFER_LEN];
    digest_file_with_buffer(path.as_ref(), hasher, &mut buffer)
}

/// Hashes the file at `path` into `hasher`, reusing `buffer` for reads.
///
/// The hasher determines both algorithm and permutation backend, so callers
/// can pin a specific backend or keep one buffer across many files.
///
/// # Errors
///
/// Propagates failures to open or read the file and rejects an empty buffer.
#[cfg_attr(
    feature = "tracing",
    instrument(
        skip_all,
        fields(path = %path.display(), algorithm = %hasher.algorithm()),
        name = "digest_file"
    )
)]
pub fn digest_file_with_buffer<P: KeccakPermutation>(
    path: &Path,
    mut hasher: Hasher<P>,
    buffer: &mut [u8],
) -> io::Result<FileDigest> {
    let file = File::open(path)?;
    let bytes_read = hasher.update_reader_with_buffer(file, buffer)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(target: "sponge::file", path = %path.display(), bytes_read, "file digested");

    Ok(FileDigest {
        digest: hasher.finalize(),
        bytes_read,
    })
}
