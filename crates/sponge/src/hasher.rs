//! Streaming digest facade over the sponge engine.

use std::io::{self, Read, Write};

use crate::algorithm::Algorithm;
use crate::dispatch;
use crate::engine::Sponge;
use crate::error::SpongeError;
use crate::permutation::{KeccakPermutation, Permutation};

/// Read buffer length used by [`Hasher::update_reader`].
const READER_BUFFER_LEN: usize = 64 * 1024;

/// Streaming Keccak digest for a named [`Algorithm`].
///
/// Unlike the underlying [`Sponge`], producing output never locks the hasher:
/// [`Hasher::sum`] works on a copy and [`Hasher::finalize_reset`] starts over.
#[derive(Clone, Debug)]
pub struct Hasher<P = Permutation> {
    algorithm: Algorithm,
    sponge: Sponge<P>,
}

impl Hasher<Permutation> {
    /// Creates a hasher bound to the process-wide permutation backend.
    ///
    /// Never fails: a backend that cannot be bound degrades to the generic
    /// permutation (see [`dispatch::global`]). Use [`Hasher::try_new`] to
    /// observe that failure instead.
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_permutation(algorithm, *dispatch::global())
    }

    /// Creates a hasher bound to the process-wide backend, failing if it
    /// could not be initialized.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::Initialization`] from [`dispatch::try_global`].
    pub fn try_new(algorithm: Algorithm) -> Result<Self, SpongeError> {
        Ok(Self::with_permutation(algorithm, dispatch::try_global()?))
    }
}

impl Default for Hasher<Permutation> {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl<P: KeccakPermutation> Hasher<P> {
    /// Creates a hasher driving the supplied permutation.
    pub fn with_permutation(algorithm: Algorithm, permutation: P) -> Self {
        Self {
            algorithm,
            sponge: Sponge::with_permutation(algorithm.params(), permutation),
        }
    }

    /// Absorbs `bytes` and reports how many were consumed.
    ///
    /// # Errors
    ///
    /// Propagates [`SpongeError::Absorption`] from the engine. A hasher only
    /// exposes finalization paths that leave it writable, so this does not
    /// occur in practice.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, SpongeError> {
        self.sponge.absorb(bytes)?;
        Ok(bytes.len())
    }

    /// Absorbs `bytes`.
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) {
        self.sponge.absorb_unchecked(bytes);
    }

    /// Feeds the remaining contents of `reader` into the hasher.
    ///
    /// Returns the number of bytes consumed.
    pub fn update_reader<R: Read>(&mut self, reader: R) -> io::Result<u64> {
        let mut buffer = vec![0u8; READER_BUFFER_LEN];
        self.update_reader_with_buffer(reader, &mut buffer)
    }

    /// Feeds `reader` into the hasher using a caller-supplied scratch buffer.
    ///
    /// Interrupted reads are retried.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when `buffer` is empty and
    /// propagates read failures.
    pub fn update_reader_with_buffer<R: Read>(
        &mut self,
        mut reader: R,
        buffer: &mut [u8],
    ) -> io::Result<u64> {
        if buffer.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "digest reader buffer must not be empty",
            ));
        }

        let mut total = 0u64;
        loop {
            let read = match reader.read(buffer) {
                Ok(0) => return Ok(total),
                Ok(read) => read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            self.update(&buffer[..read]);
            total += read as u64;
        }
    }

    /// Consumes the hasher and returns the digest.
    pub fn finalize(mut self) -> Vec<u8> {
        let mut output = vec![0u8; self.size()];
        self.sponge.pad_and_squeeze(&mut output);
        output
    }

    /// Returns the digest and resets the hasher for reuse.
    pub fn finalize_reset(&mut self) -> Vec<u8> {
        let mut output = vec![0u8; self.size()];
        self.sponge.pad_and_squeeze(&mut output);
        self.sponge.reset();
        output
    }

    /// Discards all absorbed input.
    pub fn reset(&mut self) {
        self.sponge.reset();
    }

    /// Digest length in bytes.
    pub const fn size(&self) -> usize {
        self.sponge.size()
    }

    /// Rate in bytes.
    pub const fn block_size(&self) -> usize {
        self.sponge.block_size()
    }

    /// Algorithm this hasher computes.
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Permutation backend driving the underlying sponge.
    pub const fn permutation(&self) -> &P {
        self.sponge.permutation()
    }
}

impl<P: KeccakPermutation + Clone> Hasher<P> {
    /// Digest of everything written so far followed by `extra`.
    ///
    /// The hasher itself is left untouched, so callers may keep writing and
    /// take further sums later.
    pub fn sum(&self, extra: Option<&[u8]>) -> Vec<u8> {
        let mut sponge = self.sponge.clone();
        if let Some(extra) = extra {
            sponge.absorb_unchecked(extra);
        }
        let mut output = vec![0u8; self.size()];
        sponge.pad_and_squeeze(&mut output);
        output
    }
}

impl<P: KeccakPermutation> Write for Hasher<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sponge.absorb(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<P: KeccakPermutation> digest::Update for Hasher<P> {
    fn update(&mut self, data: &[u8]) {
        self.sponge.absorb_unchecked(data);
    }
}

impl<P: KeccakPermutation> digest::Reset for Hasher<P> {
    fn reset(&mut self) {
        self.sponge.reset();
    }
}

impl<P: KeccakPermutation> digest::HashMarker for Hasher<P> {}

/// Computes the digest of `data` in one call using the process-wide backend.
///
/// Infallible like [`Hasher::new`].
pub fn digest(algorithm: Algorithm, data: &[u8]) -> Vec<u8> {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_hex;

    const SHA3_512_ABC: &str = "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0";

    fn generic(algorithm: Algorithm) -> Hasher {
        Hasher::with_permutation(algorithm, Permutation::generic())
    }

    #[test]
    fn try_new_binds_resolved_backend() {
        match dispatch::try_global() {
            Ok(permutation) => {
                let hasher = Hasher::try_new(Algorithm::Sha3_512).expect("backend resolved");
                assert_eq!(hasher.permutation(), &permutation);
            }
            Err(error) => {
                assert_eq!(Hasher::try_new(Algorithm::Sha3_512).err(), Some(error));
            }
        }
    }

    #[test]
    fn write_reports_consumed_length() {
        let mut hasher = generic(Algorithm::Sha3_512);
        assert_eq!(hasher.write(b"abc"), Ok(3));
        assert_eq!(to_hex(&hasher.finalize()), SHA3_512_ABC);
    }

    #[test]
    fn sum_does_not_mutate() {
        let mut hasher = generic(Algorithm::Sha3_512);
        hasher.update(b"ab");
        let with_extra = hasher.sum(Some(b"c".as_slice()));
        assert_eq!(to_hex(&with_extra), SHA3_512_ABC);

        // The hasher still holds only "ab".
        let again = hasher.sum(Some(b"c".as_slice()));
        assert_eq!(with_extra, again);

        hasher.update(b"c");
        assert_eq!(to_hex(&hasher.sum(None)), SHA3_512_ABC);
        assert_eq!(hasher.write(b""), Ok(0));
    }

    #[test]
    fn finalize_reset_allows_reuse() {
        let mut hasher = generic(Algorithm::Sha3_512);
        hasher.update(b"abc");
        let first = hasher.finalize_reset();
        hasher.update(b"abc");
        let second = hasher.finalize_reset();
        assert_eq!(first, second);
        assert_eq!(to_hex(&first), SHA3_512_ABC);
    }

    #[test]
    fn reset_matches_fresh_hasher() {
        let mut reused = generic(Algorithm::Sha3_256);
        reused.update(b"some earlier message");
        reused.reset();
        reused.update(b"abc");

        let mut fresh = generic(Algorithm::Sha3_256);
        fresh.update(b"abc");

        assert_eq!(reused.finalize(), fresh.finalize());
    }

    #[test]
    fn sizes_follow_algorithm() {
        for algorithm in Algorithm::ALL {
            let hasher = generic(algorithm);
            assert_eq!(hasher.size() * 8, algorithm.params().hash_bit_len());
            assert_eq!(hasher.block_size() * 8, algorithm.params().rate());
            assert_eq!(hasher.algorithm(), algorithm);
        }
    }

    #[test]
    fn io_copy_streams_into_hasher() {
        let mut hasher = generic(Algorithm::Sha3_512);
        let mut source: &[u8] = b"abc";
        let copied = io::copy(&mut source, &mut hasher).expect("copy");
        assert_eq!(copied, 3);
        assert_eq!(to_hex(&hasher.finalize()), SHA3_512_ABC);
    }

    #[test]
    fn digest_crate_update_trait() {
        fn feed<U: digest::Update>(target: &mut U, parts: &[&[u8]]) {
            for part in parts {
                target.update(part);
            }
        }

        let mut hasher = generic(Algorithm::Sha3_512);
        feed(&mut hasher, &[b"a".as_slice(), b"b", b"c"]);
        assert_eq!(to_hex(&hasher.finalize()), SHA3_512_ABC);
    }

    #[test]
    fn digest_crate_reset_trait() {
        let mut hasher = generic(Algorithm::Sha3_512);
        hasher.update(b"junk");
        digest::Reset::reset(&mut hasher);
        hasher.update(b"abc");
        assert_eq!(to_hex(&hasher.finalize()), SHA3_512_ABC);
    }

    #[test]
    fn one_shot_digest_matches_streaming() {
        let mut hasher = Hasher::new(Algorithm::Keccak256);
        hasher.update(b"abc");
        assert_eq!(digest(Algorithm::Keccak256, b"abc"), hasher.finalize());
    }

    #[test]
    fn update_reader_with_buffer_rejects_empty_buffer() {
        let mut hasher = generic(Algorithm::Sha3_512);
        let error = hasher
            .update_reader_with_buffer(&b"abc"[..], &mut [])
            .expect_err("empty buffer");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn update_reader_retries_interrupted_reads() {
        struct Flaky<'a> {
            data: &'a [u8],
            interrupted: bool,
        }

        impl Read for Flaky<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(io::Error::from(io::ErrorKind::Interrupted));
                }
                self.data.read(buf)
            }
        }

        let mut hasher = generic(Algorithm::Sha3_512);
        let reader = Flaky {
            data: b"abc",
            interrupted: false,
        };
        let consumed = hasher
            .update_reader_with_buffer(reader, &mut [0u8; 2])
            .expect("read");
        assert_eq!(consumed, 3);
        assert_eq!(to_hex(&hasher.finalize()), SHA3_512_ABC);
    }

    #[test]
    fn update_reader_propagates_errors() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }

        let mut hasher = generic(Algorithm::Sha3_512);
        let error = hasher.update_reader(Broken).expect_err("read failure");
        assert_eq!(error.to_string(), "disk on fire");
    }
}
