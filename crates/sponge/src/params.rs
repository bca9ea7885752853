//! Rate/capacity configuration of a Keccak-f[1600] sponge.

use thiserror::Error;

/// Width of the Keccak-f[1600] state in bits.
pub const STATE_BITS: usize = 1600;

/// Width of the Keccak-f[1600] state in bytes.
pub const STATE_BYTES: usize = STATE_BITS / 8;

/// Errors raised when sponge parameters violate the permutation width or output rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ParamsError {
    /// Rate and capacity do not add up to the 1600-bit state width.
    #[error("rate ({rate}) + capacity ({capacity}) must equal 1600 bits")]
    WidthMismatch {
        /// Requested rate in bits.
        rate: usize,
        /// Requested capacity in bits.
        capacity: usize,
    },
    /// Rate is zero, not byte aligned, or leaves no capacity.
    #[error("rate of {0} bits must be a non-zero multiple of 8 below 1600")]
    InvalidRate(usize),
    /// The requested digest length is zero bits.
    #[error("digest length must be at least one bit")]
    EmptyOutput,
    /// The delimited suffix carries no padding bit.
    #[error("delimited suffix must be non-zero")]
    EmptySuffix,
}

/// Validated sponge parameters: rate, capacity, output length and domain suffix.
///
/// The delimited suffix holds the domain separation bits followed by the first
/// bit of the pad10*1 rule, least significant bit first (`0x06` for SHA-3,
/// `0x1F` for SHAKE, `0x01` for the original Keccak submission).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SpongeParams {
    rate: usize,
    capacity: usize,
    hash_bit_len: usize,
    delimited_suffix: u8,
}

impl SpongeParams {
    /// SHA3-512: rate 576, capacity 1024, 512-bit output, suffix `0x06`.
    pub const SHA3_512: Self = Self {
        rate: 576,
        capacity: 1024,
        hash_bit_len: 512,
        delimited_suffix: 0x06,
    };

    /// Builds a parameter set after checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::WidthMismatch`] when `rate + capacity != 1600`,
    /// [`ParamsError::InvalidRate`] when the rate is zero, not a multiple of 8
    /// or equal to the full width, [`ParamsError::EmptyOutput`] for a zero
    /// output length and [`ParamsError::EmptySuffix`] for a zero suffix.
    pub const fn new(
        rate: usize,
        capacity: usize,
        hash_bit_len: usize,
        delimited_suffix: u8,
    ) -> Result<Self, ParamsError> {
        match rate.checked_add(capacity) {
            Some(STATE_BITS) => {}
            _ => return Err(ParamsError::WidthMismatch { rate, capacity }),
        }
        if rate == 0 || rate % 8 != 0 || rate >= STATE_BITS {
            return Err(ParamsError::InvalidRate(rate));
        }
        if hash_bit_len == 0 {
            return Err(ParamsError::EmptyOutput);
        }
        if delimited_suffix == 0 {
            return Err(ParamsError::EmptySuffix);
        }
        Ok(Self {
            rate,
            capacity,
            hash_bit_len,
            delimited_suffix,
        })
    }

    /// SHAKE128 producing `output_bits` bits of output.
    pub const fn shake128(output_bits: usize) -> Result<Self, ParamsError> {
        Self::new(1344, 256, output_bits, 0x1F)
    }

    /// SHAKE256 producing `output_bits` bits of output.
    pub const fn shake256(output_bits: usize) -> Result<Self, ParamsError> {
        Self::new(1088, 512, output_bits, 0x1F)
    }

    /// Rate in bits.
    pub const fn rate(&self) -> usize {
        self.rate
    }

    /// Capacity in bits.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Requested output length in bits.
    pub const fn hash_bit_len(&self) -> usize {
        self.hash_bit_len
    }

    /// Domain separation suffix XORed in front of the pad10*1 padding.
    pub const fn delimited_suffix(&self) -> u8 {
        self.delimited_suffix
    }

    /// Number of bytes absorbed or squeezed per permutation call.
    pub const fn rate_bytes(&self) -> usize {
        self.rate / 8
    }

    /// Number of digest bytes produced by finalization, rounded up to whole bytes.
    pub const fn output_len(&self) -> usize {
        self.hash_bit_len.div_ceil(8)
    }
}

impl Default for SpongeParams {
    fn default() -> Self {
        Self::SHA3_512
    }
}
