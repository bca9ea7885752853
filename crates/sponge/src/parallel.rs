//! Rayon integration for hashing many independent inputs.
//!
//! Each input gets its own [`Hasher`] bound to the process-wide backend;
//! results are returned in input order. The backend is resolved with
//! [`try_global`] before any work is scheduled, so an initialization failure
//! is reported instead of hashing with a fallback.

use std::io;
use std::path::Path;

use rayon::prelude::*;

use crate::algorithm::Algorithm;
use crate::dispatch::try_global;
use crate::error::SpongeError;
use crate::file::{FileDigest, digest_file};
use crate::hasher::Hasher;
use crate::permutation::Permutation;

/// Extension trait for digesting the items of a parallel iterator.
///
/// # Example
///
/// ```
/// use rayon::prelude::*;
/// use sponge::{Algorithm, parallel::ParallelDigest};
///
/// let data: Vec<Vec<u8>> = vec![b"hello".to_vec(), b"world".to_vec()];
/// let digests = data.par_iter().keccak_digest(Algorithm::Sha3_512)?;
/// assert_eq!(digests.len(), 2);
/// # Ok::<(), sponge::SpongeError>(())
/// ```
pub trait ParallelDigest {
    /// Digests every item with `algorithm`, preserving iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::Initialization`] when the process-wide backend
    /// cannot be bound.
    fn keccak_digest(self, algorithm: Algorithm) -> Result<Vec<Vec<u8>>, SpongeError>;
}

impl<I, T> ParallelDigest for I
where
    I: IndexedParallelIterator<Item = T>,
    T: AsRef<[u8]> + Send,
{
    fn keccak_digest(self, algorithm: Algorithm) -> Result<Vec<Vec<u8>>, SpongeError> {
        let permutation = try_global()?;
        Ok(self
            .map(|item| digest_with(algorithm, permutation, item.as_ref()))
            .collect())
    }
}

/// Digests each input on the rayon thread pool.
///
/// # Errors
///
/// Returns [`SpongeError::Initialization`] when the process-wide backend
/// cannot be bound.
pub fn digest_batch<T: AsRef<[u8]> + Sync>(
    algorithm: Algorithm,
    inputs: &[T],
) -> Result<Vec<Vec<u8>>, SpongeError> {
    let permutation = try_global()?;
    Ok(inputs
        .par_iter()
        .map(|input| digest_with(algorithm, permutation, input.as_ref()))
        .collect())
}

fn digest_with(algorithm: Algorithm, permutation: Permutation, data: &[u8]) -> Vec<u8> {
    let mut hasher = Hasher::with_permutation(algorithm, permutation);
    hasher.update(data);
    hasher.finalize()
}

/// Digests each file on the rayon thread pool.
///
/// Every path gets its own read buffer, so peak memory grows with the number
/// of worker threads. A backend initialization failure is reported for every
/// path, as in [`digest_file`].
pub fn digest_files<P: AsRef<Path> + Sync>(
    algorithm: Algorithm,
    paths: &[P],
) -> Vec<io::Result<FileDigest>> {
    paths
        .par_iter()
        .map(|path| digest_file(path, algorithm))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::digest;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn parallel_digest_matches_sequential() {
        let data: Vec<Vec<u8>> = vec![
            b"hello".to_vec(),
            b"world".to_vec(),
            b"test".to_vec(),
            vec![0u8; 1000],
            b"more".to_vec(),
            Vec::new(),
        ];

        let parallel = data
            .par_iter()
            .keccak_digest(Algorithm::Sha3_512)
            .expect("backend resolved");
        let batch = digest_batch(Algorithm::Sha3_512, &data).expect("backend resolved");
        let sequential: Vec<Vec<u8>> = data
            .iter()
            .map(|item| digest(Algorithm::Sha3_512, item))
            .collect();

        assert_eq!(parallel, sequential);
        assert_eq!(batch, sequential);
    }

    #[test]
    fn empty_batch_is_empty() {
        let inputs: [&[u8]; 0] = [];
        let digests = digest_batch(Algorithm::Sha3_256, &inputs).expect("backend resolved");
        assert!(digests.is_empty());
    }

    #[test]
    fn digest_files_keeps_order() {
        let dir = tempdir().expect("temp dir");

        let mut paths = Vec::new();
        for i in 0..4 {
            let path = dir.path().join(format!("file{i}.txt"));
            let mut file = std::fs::File::create(&path).expect("create");
            writeln!(file, "content of file {i}").expect("write");
            paths.push(path);
        }

        let results = digest_files(Algorithm::Sha3_512, &paths);
        assert_eq!(results.len(), paths.len());

        for (path, result) in paths.iter().zip(&results) {
            let expected = digest_file(path, Algorithm::Sha3_512).expect("sequential");
            assert_eq!(result.as_ref().expect("parallel"), &expected);
        }
    }

    #[test]
    fn digest_files_handles_missing() {
        let results = digest_files(Algorithm::Sha3_512, &["nonexistent_file_12345.txt"]);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
