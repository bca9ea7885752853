//! crates/sponge/src/engine.rs
//!
//! Sponge construction over Keccak-f[1600]: buffered absorption, pad10*1 with a
//! delimited suffix, and multi-block squeezing.

use std::fmt;

use crate::dispatch;
use crate::error::SpongeError;
use crate::params::{STATE_BYTES, SpongeParams};
use crate::permutation::{KeccakPermutation, Permutation};

/// Lifecycle phase of a [`Sponge`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Input is accepted.
    Absorbing,
    /// Output was produced; input is rejected until [`Sponge::reset`].
    Finalized,
}

/// Keccak sponge with a fixed parameter set and permutation backend.
///
/// Partial blocks are kept in an inline buffer sized for the widest possible
/// rate, so absorbing never allocates. Full blocks in the caller's input are
/// XORed into the state directly.
#[derive(Clone)]
pub struct Sponge<P = Permutation> {
    params: SpongeParams,
    state: [u64; 25],
    buffer: [u8; STATE_BYTES],
    filled: usize,
    phase: Phase,
    permutation: P,
}

impl Sponge<Permutation> {
    /// Creates a sponge bound to the process-wide backend.
    ///
    /// Falls back to the generic permutation when the backend cannot be
    /// bound; [`Sponge::try_new`] reports that instead.
    pub fn new(params: SpongeParams) -> Self {
        Self::with_permutation(params, *dispatch::global())
    }

    /// Creates a sponge bound to the process-wide backend.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::Initialization`] from [`dispatch::try_global`].
    pub fn try_new(params: SpongeParams) -> Result<Self, SpongeError> {
        Ok(Self::with_permutation(params, dispatch::try_global()?))
    }
}

impl<P: KeccakPermutation> Sponge<P> {
    /// Creates a sponge that drives the supplied permutation.
    pub fn with_permutation(params: SpongeParams, permutation: P) -> Self {
        Self {
            params,
            state: [0; 25],
            buffer: [0; STATE_BYTES],
            filled: 0,
            phase: Phase::Absorbing,
            permutation,
        }
    }

    /// Absorbs `data` into the sponge.
    ///
    /// Splitting input across calls produces the same state as one call with
    /// the concatenated bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::Absorption`] once the sponge has been finalized.
    pub fn absorb(&mut self, data: &[u8]) -> Result<(), SpongeError> {
        self.ensure_absorbing()?;
        self.absorb_unchecked(data);
        Ok(())
    }

    /// Pads, permutes and squeezes `size()` bytes of output.
    ///
    /// `extra` is absorbed first when present. The sponge enters
    /// [`Phase::Finalized`] and rejects further input until reset.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::Absorption`] if the sponge was already finalized.
    pub fn finalize(&mut self, extra: Option<&[u8]>) -> Result<Vec<u8>, SpongeError> {
        self.ensure_absorbing()?;
        if let Some(extra) = extra {
            self.absorb_unchecked(extra);
        }
        let mut output = vec![0u8; self.params.output_len()];
        self.pad_and_squeeze(&mut output);
        self.phase = Phase::Finalized;
        Ok(output)
    }

    /// Pads, permutes and fills `out` entirely with squeezed output.
    ///
    /// The length of `out` takes precedence over the configured digest
    /// length, which lets SHAKE parameter sets produce arbitrarily long
    /// output. Like [`Sponge::finalize`] this is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::Absorption`] if the sponge was already finalized.
    pub fn squeeze_into(&mut self, out: &mut [u8]) -> Result<(), SpongeError> {
        self.ensure_absorbing()?;
        self.pad_and_squeeze(out);
        self.phase = Phase::Finalized;
        Ok(())
    }

    /// Clears the state and buffer and accepts input again.
    ///
    /// Parameters and permutation backend are unchanged.
    pub fn reset(&mut self) {
        self.state = [0; 25];
        self.buffer = [0; STATE_BYTES];
        self.filled = 0;
        self.phase = Phase::Absorbing;
    }

    /// Digest length in bytes.
    pub const fn size(&self) -> usize {
        self.params.output_len()
    }

    /// Rate in bytes, the amount absorbed per permutation call.
    pub const fn block_size(&self) -> usize {
        self.params.rate_bytes()
    }

    /// Parameters the sponge was created with.
    pub const fn params(&self) -> SpongeParams {
        self.params
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Reports whether output has been produced since the last reset.
    pub const fn is_finalized(&self) -> bool {
        matches!(self.phase, Phase::Finalized)
    }

    /// Permutation backend driving this sponge.
    pub const fn permutation(&self) -> &P {
        &self.permutation
    }

    fn ensure_absorbing(&self) -> Result<(), SpongeError> {
        match self.phase {
            Phase::Absorbing => Ok(()),
            Phase::Finalized => Err(SpongeError::finalized()),
        }
    }

    pub(crate) fn absorb_unchecked(&mut self, mut data: &[u8]) {
        let rate = self.params.rate_bytes();

        if self.filled != 0 {
            let take = (rate - self.filled).min(data.len());
            self.buffer[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];

            if self.filled < rate {
                return;
            }
            absorb_block(&self.permutation, &mut self.state, &self.buffer[..rate]);
            self.filled = 0;
        }

        let mut blocks = data.chunks_exact(rate);
        for block in &mut blocks {
            absorb_block(&self.permutation, &mut self.state, block);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.filled = rest.len();
    }

    pub(crate) fn pad_and_squeeze(&mut self, out: &mut [u8]) {
        let rate = self.params.rate_bytes();
        let suffix = self.params.delimited_suffix();
        let block = &mut self.buffer[..rate];

        block[self.filled..].fill(0);
        block[self.filled] ^= suffix;

        // The suffix already carries the final padding bit position.
        if suffix & 0x80 != 0 && self.filled == rate - 1 {
            absorb_block(&self.permutation, &mut self.state, block);
            block.fill(0);
        }

        block[rate - 1] ^= 0x80;
        absorb_block(&self.permutation, &mut self.state, block);
        self.filled = 0;

        let mut chunks = out.chunks_mut(rate);
        if let Some(first) = chunks.next() {
            extract_bytes(&self.state, first);
        }
        for chunk in chunks {
            self.permutation.permute(&mut self.state);
            extract_bytes(&self.state, chunk);
        }
    }
}

impl<P> fmt::Debug for Sponge<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sponge")
            .field("params", &self.params)
            .field("buffered", &self.filled)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// XORs one rate-sized block into the leading lanes and permutes.
#[inline]
fn absorb_block<P: KeccakPermutation>(permutation: &P, state: &mut [u64; 25], block: &[u8]) {
    xor_block(state, block);
    permutation.permute(state);
}

#[inline]
fn xor_block(state: &mut [u64; 25], block: &[u8]) {
    let (lanes, tail) = block.as_chunks::<8>();
    for (lane, bytes) in state.iter_mut().zip(lanes) {
        *lane ^= u64::from_le_bytes(*bytes);
    }
    if !tail.is_empty() {
        let mut bytes = [0u8; 8];
        bytes[..tail.len()].copy_from_slice(tail);
        state[lanes.len()] ^= u64::from_le_bytes(bytes);
    }
}

#[inline]
fn extract_bytes(state: &[u64; 25], out: &mut [u8]) {
    for (chunk, lane) in out.chunks_mut(8).zip(state) {
        chunk.copy_from_slice(&lane.to_le_bytes()[..chunk.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_hex;

    const SHA3_512_EMPTY: &str = "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a615b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26";
    const SHA3_512_ABC: &str = "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0";

    fn generic_sponge(params: SpongeParams) -> Sponge {
        Sponge::with_permutation(params, Permutation::generic())
    }

    #[test]
    fn try_new_matches_try_global() {
        let sponge = Sponge::try_new(SpongeParams::SHA3_512);
        match dispatch::try_global() {
            Ok(permutation) => {
                assert_eq!(sponge.expect("backend resolved").permutation(), &permutation);
            }
            Err(error) => assert_eq!(sponge.err(), Some(error)),
        }
    }

    #[test]
    fn empty_input_sha3_512() {
        let mut sponge = generic_sponge(SpongeParams::SHA3_512);
        let digest = sponge.finalize(None).expect("finalize");
        assert_eq!(to_hex(&digest), SHA3_512_EMPTY);
    }

    #[test]
    fn extra_bytes_are_absorbed_before_padding() {
        let mut sponge = generic_sponge(SpongeParams::SHA3_512);
        let digest = sponge.finalize(Some(b"abc".as_slice())).expect("finalize");
        assert_eq!(to_hex(&digest), SHA3_512_ABC);
    }

    #[test]
    fn chunked_absorb_matches_single_call() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();

        let mut whole = generic_sponge(SpongeParams::SHA3_512);
        whole.absorb(&data).expect("absorb");

        let mut pieces = generic_sponge(SpongeParams::SHA3_512);
        for chunk in data.chunks(7) {
            pieces.absorb(chunk).expect("absorb");
        }

        assert_eq!(
            whole.finalize(None).expect("finalize"),
            pieces.finalize(None).expect("finalize")
        );
    }

    #[test]
    fn buffer_stays_below_rate() {
        let mut sponge = generic_sponge(SpongeParams::SHA3_512);
        sponge.absorb(&[0u8; 71]).expect("absorb");
        assert_eq!(sponge.filled, 71);
        sponge.absorb(&[0u8; 1]).expect("absorb");
        assert_eq!(sponge.filled, 0);
        sponge.absorb(&[0u8; 150]).expect("absorb");
        assert_eq!(sponge.filled, 150 - 144);
    }

    #[test]
    fn finalize_is_terminal() {
        let mut sponge = generic_sponge(SpongeParams::SHA3_512);
        sponge.finalize(None).expect("finalize");
        assert!(sponge.is_finalized());
        assert_eq!(sponge.absorb(b"more"), Err(SpongeError::finalized()));
        assert_eq!(sponge.finalize(None), Err(SpongeError::finalized()));
        let mut out = [0u8; 4];
        assert_eq!(sponge.squeeze_into(&mut out), Err(SpongeError::finalized()));
    }

    #[test]
    fn reset_restores_fresh_state() {
        let mut sponge = generic_sponge(SpongeParams::SHA3_512);
        sponge.absorb(b"discarded input").expect("absorb");
        sponge.finalize(None).expect("finalize");
        sponge.reset();
        assert_eq!(sponge.phase(), Phase::Absorbing);
        sponge.absorb(b"abc").expect("absorb");
        assert_eq!(to_hex(&sponge.finalize(None).expect("finalize")), SHA3_512_ABC);
    }

    #[test]
    fn size_and_block_size_follow_params() {
        let sponge = generic_sponge(SpongeParams::SHA3_512);
        assert_eq!(sponge.size(), 64);
        assert_eq!(sponge.block_size(), 72);
        assert_eq!(sponge.params(), SpongeParams::SHA3_512);
    }

    #[test]
    fn squeeze_prefix_is_stable_across_lengths() {
        let params = SpongeParams::shake128(256).expect("params");
        let mut short = generic_sponge(params);
        let mut long = generic_sponge(params);
        let mut short_out = [0u8; 32];
        let mut long_out = [0u8; 500];
        short.squeeze_into(&mut short_out).expect("squeeze");
        long.squeeze_into(&mut long_out).expect("squeeze");
        assert_eq!(
            to_hex(&short_out),
            "7f9c2ba4e88f827d616045507605853ed73b8093f6efbc88eb1a6eacfa66ef26"
        );
        assert_eq!(short_out[..], long_out[..32]);
    }

    #[test]
    fn suffix_with_top_bit_set_spills_into_extra_block() {
        // A suffix occupying bit 7 collides with the final padding bit when the
        // buffer has exactly one free byte, so an extra block is permuted.
        let params = SpongeParams::new(576, 1024, 512, 0x80 | 0x06).expect("params");
        let mut sponge = generic_sponge(params);
        sponge.absorb(&[0u8; 71]).expect("absorb");
        let first = sponge.finalize(None).expect("finalize");

        let mut state = [0u64; 25];
        let mut block = [0u8; 72];
        block[71] = 0x86;
        xor_block(&mut state, &block);
        Permutation::generic().permute(&mut state);
        let mut block = [0u8; 72];
        block[71] = 0x80;
        xor_block(&mut state, &block);
        Permutation::generic().permute(&mut state);
        let mut expected = [0u8; 64];
        extract_bytes(&state, &mut expected);

        assert_eq!(first, expected);
    }

    #[test]
    fn xor_block_handles_partial_lane() {
        let mut state = [0u64; 25];
        xor_block(&mut state, &[1, 0, 0, 0, 0, 0, 0, 0, 0xAA, 0xBB, 0xCC]);
        assert_eq!(state[0], 1);
        assert_eq!(state[1], 0x00CC_BBAA);
        assert!(state[2..].iter().all(|&lane| lane == 0));
    }

    #[test]
    fn extract_bytes_handles_partial_lane() {
        let mut state = [0u64; 25];
        state[0] = 0x0807_0605_0403_0201;
        state[1] = 0x1817_1615_1413_1211;
        let mut out = [0u8; 11];
        extract_bytes(&state, &mut out);
        assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8, 0x11, 0x12, 0x13]);
    }

    #[test]
    fn debug_omits_state() {
        let sponge = generic_sponge(SpongeParams::SHA3_512);
        let rendered = format!("{sponge:?}");
        assert!(rendered.contains("Absorbing"));
        assert!(!rendered.contains("state"));
    }
}
