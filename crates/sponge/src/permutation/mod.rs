//! Keccak-f[1600] permutation backends.
//!
//! Two implementations share one contract: the portable [`generic`]
//! reference and the unrolled kernel in [`accelerated`], which is only
//! reachable through an [`AcceleratedKernel`] token obtained after the host
//! passed its capability probe. [`Permutation`] is the closed choice between
//! them that the sponge engine carries; [`KeccakPermutation`] is the seam
//! tests use to inject instrumented permutations.

pub mod accelerated;
pub mod generic;

pub use accelerated::AcceleratedKernel;

use crate::dispatch::Backend;

/// Number of rounds in Keccak-f[1600].
pub const ROUNDS: usize = 24;

/// ι round constants, one per round.
pub const ROUND_CONSTANTS: [u64; ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// Keccak-f[1600] applied once to the all-zero state.
pub(crate) const KECCAK_F1600_ZERO_KAT: [u64; 25] = [
    0xf1258f7940e1dde7,
    0x84d5ccf933c0478a,
    0xd598261ea65aa9ee,
    0xbd1547306f80494d,
    0x8b284e056253d057,
    0xff97a42d7f8e6fd4,
    0x90fee5a0a44647c4,
    0x8c5bda0cd6192e76,
    0xad30a6f71b19059c,
    0x30935ab7d08ffc64,
    0xeb5aa93f2317d635,
    0xa9a6e6260d712103,
    0x81a57c16dbcf555f,
    0x43b831cd0347c826,
    0x01f22f1a11a5569f,
    0x05e5635a21d9ae61,
    0x64befef28cc970f2,
    0x613670957bc46611,
    0xb87c5a554fd00ecb,
    0x8c3ee88a1ccf32c8,
    0x940c7922ae3a2614,
    0x1841f924a2c509e4,
    0x16f53526e70465c2,
    0x75f644e97f30a13b,
    0xeaf1ff7b5ceca249,
];

/// A Keccak-f[1600] implementation the sponge engine can drive.
///
/// Implementations must apply exactly the 24-round permutation; the engine
/// relies on bit-exact output for FIPS 202 compatibility.
pub trait KeccakPermutation {
    /// Permutes the 25-lane state in place.
    fn permute(&self, state: &mut [u64; 25]);
}

impl<P: KeccakPermutation + ?Sized> KeccakPermutation for &P {
    #[inline]
    fn permute(&self, state: &mut [u64; 25]) {
        (**self).permute(state);
    }
}

/// The permutation backend bound to a sponge.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Permutation {
    /// Portable reference implementation.
    #[default]
    Generic,
    /// Unrolled kernel compiled for the detected CPU features.
    Accelerated(AcceleratedKernel),
}

impl Permutation {
    /// Returns the portable reference permutation.
    pub const fn generic() -> Self {
        Self::Generic
    }

    /// Reports which backend this permutation dispatches to.
    pub const fn backend(self) -> Backend {
        match self {
            Self::Generic => Backend::Generic,
            Self::Accelerated(_) => Backend::Accelerated,
        }
    }
}

impl KeccakPermutation for Permutation {
    #[inline]
    fn permute(&self, state: &mut [u64; 25]) {
        match self {
            Self::Generic => generic::keccak_f1600(state),
            Self::Accelerated(kernel) => kernel.permute(state),
        }
    }
}
