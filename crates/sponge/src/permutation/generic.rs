//! Portable Keccak-f[1600] written against the step mappings of FIPS 202 §3.2.
//!
//! Lanes are indexed as `x + 5 * y`. Every round applies θ, ρ, π, χ and ι in
//! turn; ρ and π are fused into a single walk over the lane cycle starting at
//! `(1, 0)`.

use super::ROUND_CONSTANTS;

/// Rotation offsets for ρ, listed in the order π visits the lanes.
const RHO_OFFSETS: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Destination lane of each step along the π cycle.
const PI_LANES: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// Applies the 24-round Keccak-f[1600] permutation in place.
pub fn keccak_f1600(state: &mut [u64; 25]) {
    for &round_constant in &ROUND_CONSTANTS {
        theta(state);
        rho_pi(state);
        chi(state);
        // ι
        state[0] ^= round_constant;
    }
}

#[inline]
fn theta(state: &mut [u64; 25]) {
    let mut parity = [0u64; 5];
    for (x, column) in parity.iter_mut().enumerate() {
        *column = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
    }
    for x in 0..5 {
        let d = parity[(x + 4) % 5] ^ parity[(x + 1) % 5].rotate_left(1);
        for y in 0..5 {
            state[x + 5 * y] ^= d;
        }
    }
}

#[inline]
fn rho_pi(state: &mut [u64; 25]) {
    let mut carried = state[1];
    for (&lane, &offset) in PI_LANES.iter().zip(RHO_OFFSETS.iter()) {
        let displaced = state[lane];
        state[lane] = carried.rotate_left(offset);
        carried = displaced;
    }
}

#[inline]
fn chi(state: &mut [u64; 25]) {
    for y in 0..5 {
        let row = [
            state[5 * y],
            state[5 * y + 1],
            state[5 * y + 2],
            state[5 * y + 3],
            state[5 * y + 4],
        ];
        for x in 0..5 {
            state[x + 5 * y] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
        }
    }
}
