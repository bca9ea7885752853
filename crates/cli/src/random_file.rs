//! Temporary file of random bytes used when no FILE operand is given.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::RngCore;
use tempfile::NamedTempFile;

use crate::error::CliError;

const MIB: usize = 1024 * 1024;

/// Random input removed from disk when dropped.
#[derive(Debug)]
pub struct RandomFile {
    file: NamedTempFile,
    len: u64,
}

impl RandomFile {
    /// Creates a file holding `size_mib` MiB of random bytes.
    pub fn create(size_mib: u64) -> Result<Self, CliError> {
        let file = tempfile::Builder::new()
            .prefix("keccaksum-")
            .tempfile()
            .map_err(CliError::RandomFile)?;
        let len = size_mib
            .checked_mul(MIB as u64)
            .ok_or_else(|| CliError::RandomFile(io::Error::other("random file size overflows")))?;

        fill_random(file.as_file(), len).map_err(CliError::RandomFile)?;
        tracing::debug!(path = %file.path().display(), bytes = len, "generated random input");
        Ok(Self { file, len })
    }

    /// Location of the generated file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of random bytes written.
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the file holds no bytes.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn fill_random<W: Write>(writer: W, mut remaining: u64) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut writer = BufWriter::new(writer);
    let mut chunk = vec![0u8; MIB];
    while remaining > 0 {
        let take = usize::try_from(remaining).map_or(MIB, |left| left.min(MIB));
        rng.fill_bytes(&mut chunk[..take]);
        writer.write_all(&chunk[..take])?;
        remaining -= take as u64;
    }
    writer.flush()
}
