//! Failures that end a `keccaksum` run with exit status 1.

use std::io;
use std::path::PathBuf;

use sponge::SpongeError;
use thiserror::Error;

/// Errors raised while executing a parsed command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// A FILE operand does not exist.
    #[error("file {} doesn't exist", .path.display())]
    MissingFile {
        /// Path as given on the command line.
        path: PathBuf,
    },

    /// Reading a FILE operand failed part way.
    #[error("failed to hash {}: {source}", .path.display())]
    Read {
        /// File being hashed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The permutation backend could not be bound.
    #[error(transparent)]
    Sponge(#[from] SpongeError),

    /// The random input file could not be created or filled.
    #[error("failed to generate random input file: {0}")]
    RandomFile(#[source] io::Error),
}

impl CliError {
    pub(crate) fn read(path: &std::path::Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
