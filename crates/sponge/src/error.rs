//! crates/sponge/src/error.rs
//!
//! Error types surfaced by the sponge engine and backend selection.

use std::io;

use thiserror::Error;

use crate::params::ParamsError;

/// Reason an absorb or finalize call was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AbsorbErrorKind {
    /// The engine was already finalized and has not been reset since.
    Finalized,
}

impl AbsorbErrorKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Finalized => "sponge already finalized; call reset before absorbing again",
        }
    }
}

impl std::fmt::Display for AbsorbErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the sponge engine, the digest facade and backend selection.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SpongeError {
    /// The selected permutation backend passed its capability probe but could not be bound.
    #[error("failed to initialize {backend} permutation backend: {reason}")]
    Initialization {
        /// Name of the backend that failed to bind.
        backend: &'static str,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// Bytes were offered to an engine that no longer accepts input.
    #[error("{0}")]
    Absorption(AbsorbErrorKind),
    /// Sponge parameters violate the Keccak-f[1600] width or output invariants.
    #[error("invalid sponge parameters: {0}")]
    InvalidParameters(#[from] ParamsError),
    /// An algorithm name did not match any supported digest.
    #[error("unknown digest algorithm '{0}'")]
    UnknownAlgorithm(String),
}

impl SpongeError {
    pub(crate) const fn finalized() -> Self {
        Self::Absorption(AbsorbErrorKind::Finalized)
    }
}

impl From<SpongeError> for io::Error {
    fn from(error: SpongeError) -> Self {
        Self::other(error)
    }
}
