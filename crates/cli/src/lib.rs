#![deny(unsafe_code)]

//! Command-line front end for `keccaksum`.
//!
//! [`run`] parses arguments, binds a permutation backend, hashes every FILE
//! operand (or a generated file of random bytes) and reports timing. The
//! binary forwards process arguments and stdio here and converts the status
//! with [`exit_code_from`], which keeps the whole flow testable with in-memory
//! buffers.

mod args;
mod error;
mod logging;
mod random_file;
mod report;

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use sponge::{DEFAULT_READ_BUFFER_LEN, FileDigest, Hasher, Permutation, digest_file_with_buffer};
use tracing::{debug, info};

pub use args::{Args, BackendChoice, TimeUnit};
pub use error::CliError;
pub use random_file::RandomFile;
pub use report::timing_line;

/// Name used as the diagnostic prefix.
pub const PROGRAM_NAME: &str = "keccaksum";

/// Highest status a process can report.
const MAX_EXIT_CODE: i32 = 255;

/// Status for runtime failures.
const FAILURE: i32 = 1;

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns `0` on success, `1` when hashing fails and `2` for usage errors.
/// Help and version output go to `stdout`; diagnostics go to `stderr`.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let args = match Args::try_parse_from(arguments) {
        Ok(args) => args,
        Err(error) => {
            let rendered = error.render();
            let written = if error.use_stderr() {
                write!(stderr, "{rendered}")
            } else {
                write!(stdout, "{rendered}")
            };
            if written.is_err() {
                return FAILURE;
            }
            return error.exit_code();
        }
    };

    logging::init(args.verbose);

    match execute(&args, stdout) {
        Ok(()) => 0,
        Err(error) => {
            debug!(?error, "run failed");
            let _ = writeln!(stderr, "{PROGRAM_NAME}: error: {error}");
            FAILURE
        }
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

fn execute<Out: Write>(args: &Args, stdout: &mut Out) -> Result<(), CliError> {
    let permutation = resolve_permutation(args.backend)?;
    info!(
        backend = %permutation.backend(),
        algorithm = %args.algorithm,
        "selected permutation"
    );

    // Kept alive until every digest is printed; dropping it removes the file.
    let random = if args.files.is_empty() {
        Some(RandomFile::create(args.size)?)
    } else {
        None
    };
    let paths: Vec<&Path> = match &random {
        Some(file) => vec![file.path()],
        None => args.files.iter().map(PathBuf::as_path).collect(),
    };

    if let Some(missing) = paths.iter().find(|path| !path.exists()) {
        return Err(CliError::MissingFile {
            path: missing.to_path_buf(),
        });
    }

    #[cfg(feature = "parallel")]
    if args.parallel {
        return hash_parallel(args, &paths, stdout);
    }

    let mut buffer = vec![0u8; DEFAULT_READ_BUFFER_LEN];
    for path in paths {
        hash_sequential(args, permutation, path, &mut buffer, stdout)?;
    }
    Ok(())
}

fn resolve_permutation(choice: BackendChoice) -> Result<Permutation, CliError> {
    match choice {
        BackendChoice::Auto => Ok(sponge::try_global()?),
        BackendChoice::Generic => Ok(Permutation::generic()),
    }
}

fn timed_digest(
    args: &Args,
    permutation: Permutation,
    path: &Path,
    buffer: &mut [u8],
) -> Result<(FileDigest, Duration), CliError> {
    let hasher = Hasher::with_permutation(args.algorithm, permutation);
    let start = Instant::now();
    let digest =
        digest_file_with_buffer(path, hasher, buffer).map_err(|source| CliError::read(path, source))?;
    Ok((digest, start.elapsed()))
}

fn hash_sequential<Out: Write>(
    args: &Args,
    permutation: Permutation,
    path: &Path,
    buffer: &mut [u8],
    stdout: &mut Out,
) -> Result<(), CliError> {
    let (digest, first) = timed_digest(args, permutation, path, buffer)?;
    let mut timings = Vec::with_capacity(args.iterations as usize);
    timings.push(first);
    for _ in 1..args.iterations {
        let (_, elapsed) = timed_digest(args, permutation, path, buffer)?;
        timings.push(elapsed);
    }

    report::write_digest_line(stdout, &digest, path)?;
    if !args.quiet {
        report::write_timings(stdout, &timings, args.unit, args.average, digest.bytes_read)?;
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn hash_parallel<Out: Write>(args: &Args, paths: &[&Path], stdout: &mut Out) -> Result<(), CliError> {
    let start = Instant::now();
    let results = sponge::parallel::digest_files(args.algorithm, paths);
    let elapsed = start.elapsed();

    let mut total = 0u64;
    for (path, result) in paths.iter().zip(results) {
        let digest = result.map_err(|source| CliError::read(path, source))?;
        total += digest.bytes_read;
        report::write_digest_line(stdout, &digest, path)?;
    }
    if !args.quiet {
        writeln!(stdout, "{}", timing_line(elapsed, args.unit, total))?;
    }
    Ok(())
}
