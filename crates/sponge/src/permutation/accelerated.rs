//! Unrolled Keccak-f[1600] compiled for host CPU extensions.
//!
//! # Safety
//!
//! The kernel entry points are `#[target_feature]` functions and must only run
//! on CPUs that expose the enabled extensions:
//!
//! - **x86_64**: `bmi1` (`andn` for χ) and `bmi2` (`rorx` for the ρ and θ
//!   rotations), checked with `is_x86_feature_detected!`.
//! - **aarch64**: `neon`, checked with `is_aarch64_feature_detected!`.
//!
//! The probe result is cached in a `OnceLock`. [`AcceleratedKernel`] can only
//! be obtained through [`AcceleratedKernel::bind`], which requires a passing
//! probe and a known-answer self-test, so holding a token proves the
//! extensions are present. On every other architecture the probe fails and no
//! token can exist.
//!
//! The round function keeps all 25 lanes in locals named after the Keccak
//! team's row/column letters (`b g k m s` for y, `a e i o u` for x), so the
//! whole permutation runs without touching memory between rounds.

#![allow(unsafe_code)]

use std::fmt;
use std::sync::OnceLock;

use super::{KECCAK_F1600_ZERO_KAT, ROUND_CONSTANTS};
use crate::error::SpongeError;

/// Backend name used in diagnostics and errors.
pub const NAME: &str = "accelerated";

#[cfg(target_arch = "x86_64")]
const REQUIRED_FEATURES: &str = "bmi1+bmi2";
#[cfg(target_arch = "aarch64")]
const REQUIRED_FEATURES: &str = "neon";
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const REQUIRED_FEATURES: &str = "none available on this architecture";

static HOST_SUPPORTED: OnceLock<bool> = OnceLock::new();

/// Reports whether the running CPU exposes the extensions the kernel is compiled for.
#[inline]
pub fn host_supports_kernel() -> bool {
    *HOST_SUPPORTED.get_or_init(detect_host_support)
}

#[cfg(target_arch = "x86_64")]
fn detect_host_support() -> bool {
    std::arch::is_x86_feature_detected!("bmi1") && std::arch::is_x86_feature_detected!("bmi2")
}

#[cfg(target_arch = "aarch64")]
fn detect_host_support() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect_host_support() -> bool {
    false
}

/// Proof that the accelerated kernel may run on this CPU.
///
/// The private field keeps construction inside [`AcceleratedKernel::bind`].
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct AcceleratedKernel {
    _probed: (),
}

impl AcceleratedKernel {
    /// Probes the CPU and self-tests the kernel.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::Initialization`] when the required extensions are
    /// missing or when the kernel disagrees with the Keccak-f[1600] known
    /// answer for the zero state.
    pub fn bind() -> Result<Self, SpongeError> {
        if !host_supports_kernel() {
            return Err(SpongeError::Initialization {
                backend: NAME,
                reason: format!("required CPU features ({REQUIRED_FEATURES}) not detected"),
            });
        }

        let kernel = Self { _probed: () };
        let mut state = [0u64; 25];
        kernel.permute(&mut state);
        if state != KECCAK_F1600_ZERO_KAT {
            return Err(SpongeError::Initialization {
                backend: NAME,
                reason: "known-answer self-test mismatch".to_owned(),
            });
        }
        Ok(kernel)
    }

    /// CPU extensions the kernel is compiled for on this architecture.
    pub const fn required_features() -> &'static str {
        REQUIRED_FEATURES
    }

    /// Applies Keccak-f[1600] using the accelerated kernel.
    #[inline]
    pub fn permute(self, state: &mut [u64; 25]) {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: tokens are only created by `bind` after bmi1 and bmi2 were detected.
        unsafe {
            keccak_f1600_bmi(state);
        }

        #[cfg(target_arch = "aarch64")]
        // SAFETY: tokens are only created by `bind` after neon was detected.
        unsafe {
            keccak_f1600_neon(state);
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        super::generic::keccak_f1600(state);
    }
}

impl fmt::Debug for AcceleratedKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceleratedKernel")
            .field("features", &REQUIRED_FEATURES)
            .finish()
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi1,bmi2")]
unsafe fn keccak_f1600_bmi(state: &mut [u64; 25]) {
    keccak_f1600_unrolled(state);
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn keccak_f1600_neon(state: &mut [u64; 25]) {
    keccak_f1600_unrolled(state);
}

#[cfg_attr(
    not(any(target_arch = "x86_64", target_arch = "aarch64")),
    allow(dead_code)
)]
#[inline(always)]
fn keccak_f1600_unrolled(state: &mut [u64; 25]) {
    let [
        mut aba,
        mut abe,
        mut abi,
        mut abo,
        mut abu,
        mut aga,
        mut age,
        mut agi,
        mut ago,
        mut agu,
        mut aka,
        mut ake,
        mut aki,
        mut ako,
        mut aku,
        mut ama,
        mut ame,
        mut ami,
        mut amo,
        mut amu,
        mut asa,
        mut ase,
        mut asi,
        mut aso,
        mut asu,
    ] = *state;

    macro_rules! round {
        ($rc:expr) => {{
            // θ
            let c0 = aba ^ aga ^ aka ^ ama ^ asa;
            let c1 = abe ^ age ^ ake ^ ame ^ ase;
            let c2 = abi ^ agi ^ aki ^ ami ^ asi;
            let c3 = abo ^ ago ^ ako ^ amo ^ aso;
            let c4 = abu ^ agu ^ aku ^ amu ^ asu;
            let d0 = c4 ^ c1.rotate_left(1);
            let d1 = c0 ^ c2.rotate_left(1);
            let d2 = c1 ^ c3.rotate_left(1);
            let d3 = c2 ^ c4.rotate_left(1);
            let d4 = c3 ^ c0.rotate_left(1);

            // ρ and π
            let bba = aba ^ d0;
            let bka = (abe ^ d1).rotate_left(1);
            let bsa = (abi ^ d2).rotate_left(62);
            let bga = (abo ^ d3).rotate_left(28);
            let bma = (abu ^ d4).rotate_left(27);
            let bme = (aga ^ d0).rotate_left(36);
            let bbe = (age ^ d1).rotate_left(44);
            let bke = (agi ^ d2).rotate_left(6);
            let bse = (ago ^ d3).rotate_left(55);
            let bge = (agu ^ d4).rotate_left(20);
            let bgi = (aka ^ d0).rotate_left(3);
            let bmi = (ake ^ d1).rotate_left(10);
            let bbi = (aki ^ d2).rotate_left(43);
            let bki = (ako ^ d3).rotate_left(25);
            let bsi = (aku ^ d4).rotate_left(39);
            let bso = (ama ^ d0).rotate_left(41);
            let bgo = (ame ^ d1).rotate_left(45);
            let bmo = (ami ^ d2).rotate_left(15);
            let bbo = (amo ^ d3).rotate_left(21);
            let bko = (amu ^ d4).rotate_left(8);
            let bku = (asa ^ d0).rotate_left(18);
            let bsu = (ase ^ d1).rotate_left(2);
            let bgu = (asi ^ d2).rotate_left(61);
            let bmu = (aso ^ d3).rotate_left(56);
            let bbu = (asu ^ d4).rotate_left(14);

            // χ
            aba = bba ^ (!bbe & bbi);
            abe = bbe ^ (!bbi & bbo);
            abi = bbi ^ (!bbo & bbu);
            abo = bbo ^ (!bbu & bba);
            abu = bbu ^ (!bba & bbe);
            aga = bga ^ (!bge & bgi);
            age = bge ^ (!bgi & bgo);
            agi = bgi ^ (!bgo & bgu);
            ago = bgo ^ (!bgu & bga);
            agu = bgu ^ (!bga & bge);
            aka = bka ^ (!bke & bki);
            ake = bke ^ (!bki & bko);
            aki = bki ^ (!bko & bku);
            ako = bko ^ (!bku & bka);
            aku = bku ^ (!bka & bke);
            ama = bma ^ (!bme & bmi);
            ame = bme ^ (!bmi & bmo);
            ami = bmi ^ (!bmo & bmu);
            amo = bmo ^ (!bmu & bma);
            amu = bmu ^ (!bma & bme);
            asa = bsa ^ (!bse & bsi);
            ase = bse ^ (!bsi & bso);
            asi = bsi ^ (!bso & bsu);
            aso = bso ^ (!bsu & bsa);
            asu = bsu ^ (!bsa & bse);

            // ι
            aba ^= $rc;
        }};
    }

    round!(ROUND_CONSTANTS[0]);
    round!(ROUND_CONSTANTS[1]);
    round!(ROUND_CONSTANTS[2]);
    round!(ROUND_CONSTANTS[3]);
    round!(ROUND_CONSTANTS[4]);
    round!(ROUND_CONSTANTS[5]);
    round!(ROUND_CONSTANTS[6]);
    round!(ROUND_CONSTANTS[7]);
    round!(ROUND_CONSTANTS[8]);
    round!(ROUND_CONSTANTS[9]);
    round!(ROUND_CONSTANTS[10]);
    round!(ROUND_CONSTANTS[11]);
    round!(ROUND_CONSTANTS[12]);
    round!(ROUND_CONSTANTS[13]);
    round!(ROUND_CONSTANTS[14]);
    round!(ROUND_CONSTANTS[15]);
    round!(ROUND_CONSTANTS[16]);
    round!(ROUND_CONSTANTS[17]);
    round!(ROUND_CONSTANTS[18]);
    round!(ROUND_CONSTANTS[19]);
    round!(ROUND_CONSTANTS[20]);
    round!(ROUND_CONSTANTS[21]);
    round!(ROUND_CONSTANTS[22]);
    round!(ROUND_CONSTANTS[23]);

    *state = [
        aba,
        abe,
        abi,
        abo,
        abu,
        aga,
        age,
        agi,
        ago,
        agu,
        aka,
        ake,
        aki,
        ako,
        aku,
        ama,
        ame,
        ami,
        amo,
        amu,
        asa,
        ase,
        asi,
        aso,
        asu,
    ];
}
