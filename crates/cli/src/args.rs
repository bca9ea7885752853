//! Command-line argument definitions.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use sponge::Algorithm;

/// Hash files with Keccak/SHA-3 and report throughput.
///
/// Without FILE operands a temporary file of random bytes is generated,
/// hashed, and removed again.
#[derive(Parser, Debug)]
#[command(name = "keccaksum")]
#[command(about = "Keccak/SHA-3 file digests with throughput timing")]
#[command(version)]
pub struct Args {
    /// Files to hash.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Size of the generated random file in MiB.
    #[arg(short, long, value_name = "MIB", default_value_t = 10)]
    pub size: u64,

    /// Unit for the timing lines.
    #[arg(short, long, value_enum, ignore_case = true, default_value_t)]
    pub unit: TimeUnit,

    /// Number of runs per file, each with a fresh hasher.
    #[arg(
        short = 'n',
        long = "iter",
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub iterations: u32,

    /// Print one averaged timing line instead of one per run.
    #[arg(long = "avg")]
    pub average: bool,

    /// Digest algorithm (sha3-224/256/384/512, keccak-224/256/384/512, shake128/256).
    #[arg(short, long, value_name = "NAME", default_value_t = Algorithm::Sha3_512)]
    pub algorithm: Algorithm,

    /// Permutation backend.
    #[arg(long, value_enum, default_value_t)]
    pub backend: BackendChoice,

    /// Hash all files concurrently, once, with the process-wide backend.
    #[cfg(feature = "parallel")]
    #[arg(short = 'j', long, conflicts_with = "backend")]
    pub parallel: bool,

    /// Only print digest lines.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Time unit for reported durations.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum TimeUnit {
    /// Nanoseconds.
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    #[default]
    S,
}

impl TimeUnit {
    /// Short label printed after the value.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ns => "ns",
            Self::Us => "us",
            Self::Ms => "ms",
            Self::S => "s",
        }
    }

    /// Expresses `elapsed` in this unit.
    pub fn convert(self, elapsed: Duration) -> f64 {
        let nanos = elapsed.as_nanos() as f64;
        match self {
            Self::Ns => nanos,
            Self::Us => nanos / 1e3,
            Self::Ms => nanos / 1e6,
            Self::S => nanos / 1e9,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which permutation the run binds.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum BackendChoice {
    /// Whatever the host's capability probe selects.
    #[default]
    Auto,
    /// The portable reference permutation.
    Generic,
}
