#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod algorithm;
mod dispatch;
mod engine;
mod error;
mod file;
mod hasher;
mod params;
pub mod permutation;

#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub mod parallel;

pub use algorithm::Algorithm;
pub use dispatch::{
    Backend, FeatureLevel, MIN_ACCELERATED_LEVEL, active_backend, global, select_backend,
    try_global,
};
pub use engine::{Phase, Sponge};
pub use error::{AbsorbErrorKind, SpongeError};
pub use file::{
    DEFAULT_READ_BUFFER_LEN, FileDigest, digest_file, digest_file_with_buffer, to_hex,
};
pub use hasher::{Hasher, digest};
pub use params::{ParamsError, STATE_BITS, STATE_BYTES, SpongeParams};
pub use permutation::{KeccakPermutation, Permutation};
