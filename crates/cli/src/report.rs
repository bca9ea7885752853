//! Timing and throughput lines.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use sponge::FileDigest;

use crate::args::TimeUnit;

const MIB: f64 = 1_048_576.0;

/// Between digest and path, as in `sha3sum`/`sha512sum` output, so the lines
/// can be fed back to `--check` style tools.
pub const DIGEST_SEPARATOR: &str = "  ";

/// Writes `<hex><DIGEST_SEPARATOR><path>`.
pub fn write_digest_line<W: Write>(
    out: &mut W,
    digest: &FileDigest,
    path: &Path,
) -> io::Result<()> {
    writeln!(out, "{}{DIGEST_SEPARATOR}{}", digest.to_hex(), path.display())
}

/// Renders `Calculated in <t> <unit>, <rate> MBps` for one measurement.
pub fn timing_line(elapsed: Duration, unit: TimeUnit, bytes: u64) -> String {
    format!(
        "Calculated in {:.6} {unit}, {} MBps",
        unit.convert(elapsed),
        throughput(elapsed, bytes)
    )
}

/// MiB per second, or `inf` when nothing measurable elapsed.
fn throughput(elapsed: Duration, bytes: u64) -> String {
    if elapsed.is_zero() {
        return format!("{:>5}", "inf");
    }
    format!("{:5.2}", bytes as f64 / MIB / elapsed.as_secs_f64())
}

/// Mean of `timings`; zero for an empty slice.
pub fn average(timings: &[Duration]) -> Duration {
    let Ok(count) = u32::try_from(timings.len()) else {
        return Duration::ZERO;
    };
    if count == 0 {
        return Duration::ZERO;
    }
    timings.iter().sum::<Duration>() / count
}

/// Writes one line per run, or a single averaged line.
pub fn write_timings<W: Write>(
    out: &mut W,
    timings: &[Duration],
    unit: TimeUnit,
    averaged: bool,
    bytes: u64,
) -> io::Result<()> {
    if averaged {
        return writeln!(out, "{}", timing_line(average(timings), unit, bytes));
    }
    for &elapsed in timings {
        writeln!(out, "{}", timing_line(elapsed, unit, bytes))?;
    }
    Ok(())
}
