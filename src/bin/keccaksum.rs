#![deny(unsafe_code)]

use mimalloc::MiMalloc;

/// High-performance memory allocator for read buffers and digest output.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::{env, io, process::ExitCode};

fn main() -> ExitCode {
    // Stderr stays unlocked: rayon workers may emit log events mid-run.
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();
    let status = cli::run(env::args_os(), &mut stdout, &mut stderr);
    cli::exit_code_from(status)
}
