//! Named Keccak digest variants and their sponge parameters.

use std::fmt;
use std::str::FromStr;

use crate::error::SpongeError;
use crate::params::{STATE_BITS, SpongeParams};

const SHA3_SUFFIX: u8 = 0x06;
const KECCAK_SUFFIX: u8 = 0x01;
const SHAKE_SUFFIX: u8 = 0x1F;

/// Parameters indexed by [`Algorithm`] discriminant, validated at compile time.
const PARAMS: [SpongeParams; 10] = [
    table_entry(1152, 224, SHA3_SUFFIX),
    table_entry(1088, 256, SHA3_SUFFIX),
    table_entry(832, 384, SHA3_SUFFIX),
    SpongeParams::SHA3_512,
    table_entry(1152, 224, KECCAK_SUFFIX),
    table_entry(1088, 256, KECCAK_SUFFIX),
    table_entry(832, 384, KECCAK_SUFFIX),
    table_entry(576, 512, KECCAK_SUFFIX),
    table_entry(1344, 256, SHAKE_SUFFIX),
    table_entry(1088, 512, SHAKE_SUFFIX),
];

const fn table_entry(rate: usize, bits: usize, suffix: u8) -> SpongeParams {
    match SpongeParams::new(rate, STATE_BITS - rate, bits, suffix) {
        Ok(params) => params,
        Err(_) => panic!("algorithm table entry violates sponge invariants"),
    }
}

/// Digest algorithms built on Keccak-f[1600].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Algorithm {
    /// FIPS 202 SHA3-224.
    Sha3_224,
    /// FIPS 202 SHA3-256.
    Sha3_256,
    /// FIPS 202 SHA3-384.
    Sha3_384,
    /// FIPS 202 SHA3-512.
    #[default]
    Sha3_512,
    /// Original Keccak submission with 224-bit output.
    Keccak224,
    /// Original Keccak submission with 256-bit output.
    Keccak256,
    /// Original Keccak submission with 384-bit output.
    Keccak384,
    /// Original Keccak submission with 512-bit output.
    Keccak512,
    /// SHAKE128 with a 256-bit default output.
    Shake128,
    /// SHAKE256 with a 512-bit default output.
    Shake256,
}

impl Algorithm {
    /// Every supported algorithm, in display order.
    pub const ALL: [Self; 10] = [
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Keccak224,
        Self::Keccak256,
        Self::Keccak384,
        Self::Keccak512,
        Self::Shake128,
        Self::Shake256,
    ];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
            Self::Keccak224 => "keccak-224",
            Self::Keccak256 => "keccak-256",
            Self::Keccak384 => "keccak-384",
            Self::Keccak512 => "keccak-512",
            Self::Shake128 => "shake128",
            Self::Shake256 => "shake256",
        }
    }

    /// Sponge parameters for this algorithm.
    pub const fn params(self) -> SpongeParams {
        PARAMS[self as usize]
    }

    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        self.params().output_len()
    }

    /// Reports whether the algorithm is an extendable-output function.
    pub const fn is_xof(self) -> bool {
        matches!(self, Self::Shake128 | Self::Shake256)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SpongeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowered = name.trim().to_ascii_lowercase();
        if matches!(lowered.as_str(), "sha3_512" | "keccak512-fips") {
            return Ok(Self::Sha3_512);
        }
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == lowered)
            .ok_or_else(|| SpongeError::UnknownAlgorithm(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_match_bit_lengths() {
        for algorithm in Algorithm::ALL {
            let params = algorithm.params();
            assert_eq!(params.rate() + params.capacity(), 1600, "{algorithm}");
            assert_eq!(algorithm.output_len() * 8, params.hash_bit_len(), "{algorithm}");
        }
    }

    #[test]
    fn params_follow_declaration_order() {
        assert_eq!(Algorithm::Sha3_224.params().rate(), 1152);
        assert_eq!(Algorithm::Keccak384.params().rate(), 832);
        assert_eq!(Algorithm::Shake128.params().rate(), 1344);
        assert_eq!(Algorithm::Shake256.params().hash_bit_len(), 512);
    }

    #[test]
    fn sha3_512_uses_canonical_params() {
        assert_eq!(Algorithm::Sha3_512.params(), SpongeParams::SHA3_512);
        assert_eq!(Algorithm::default(), Algorithm::Sha3_512);
    }

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn aliases_resolve_to_sha3_512() {
        assert_eq!("sha3_512".parse::<Algorithm>(), Ok(Algorithm::Sha3_512));
        assert_eq!("keccak512-fips".parse::<Algorithm>(), Ok(Algorithm::Sha3_512));
        assert_eq!("SHA3-512".parse::<Algorithm>(), Ok(Algorithm::Sha3_512));
    }

    #[test]
    fn unknown_name_is_reported() {
        assert_eq!(
            "md5".parse::<Algorithm>(),
            Err(SpongeError::UnknownAlgorithm("md5".to_owned()))
        );
    }

    #[test]
    fn suffixes_by_family() {
        assert_eq!(Algorithm::Sha3_256.params().delimited_suffix(), 0x06);
        assert_eq!(Algorithm::Keccak256.params().delimited_suffix(), 0x01);
        assert_eq!(Algorithm::Shake128.params().delimited_suffix(), 0x1F);
        assert!(Algorithm::Shake256.is_xof());
        assert!(!Algorithm::Keccak512.is_xof());
    }
}
