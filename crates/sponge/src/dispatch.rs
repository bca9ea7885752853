//! Runtime CPU detection and permutation backend selection.
//!
//! The probe runs once per process. Its outcome is cached in a `OnceLock` so
//! every sponge created afterwards binds the same backend, and concurrent
//! first callers observe a single resolution.

use std::fmt;
use std::sync::OnceLock;

use crate::error::SpongeError;
use crate::permutation::{AcceleratedKernel, Permutation, accelerated};

/// Available permutation backends.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Portable reference permutation.
    Generic,
    /// Unrolled kernel compiled for detected CPU extensions.
    Accelerated,
}

impl Backend {
    /// Stable lowercase name used in logs and command-line output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Accelerated => accelerated::NAME,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered CPU capability revision relevant to the permutation kernels.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FeatureLevel {
    /// No extensions beyond the base instruction set are usable.
    Baseline,
    /// The extensions required by the accelerated kernel are present.
    Accelerated,
}

impl FeatureLevel {
    /// Reads the capability level of the running CPU.
    pub fn detect() -> Self {
        if accelerated::host_supports_kernel() {
            Self::Accelerated
        } else {
            Self::Baseline
        }
    }
}

/// Lowest capability level at which the accelerated kernel is bound.
pub const MIN_ACCELERATED_LEVEL: FeatureLevel = FeatureLevel::Accelerated;

/// Probes the host and picks the fastest correct permutation.
///
/// A host below [`MIN_ACCELERATED_LEVEL`] resolves to the generic backend;
/// that is not an error.
///
/// # Errors
///
/// Returns [`SpongeError::Initialization`] when the probe passes but the
/// accelerated kernel cannot be bound.
pub fn select_backend() -> Result<Permutation, SpongeError> {
    select_for_level(FeatureLevel::detect(), bind_accelerated)
}

fn bind_accelerated() -> Result<Permutation, SpongeError> {
    AcceleratedKernel::bind().map(Permutation::Accelerated)
}

/// Picks the backend for `level`, calling `bind` only when the level qualifies
/// for the accelerated kernel.
fn select_for_level<B>(level: FeatureLevel, bind: B) -> Result<Permutation, SpongeError>
where
    B: FnOnce() -> Result<Permutation, SpongeError>,
{
    #[cfg(feature = "accelerated")]
    if level >= MIN_ACCELERATED_LEVEL {
        return bind();
    }

    #[cfg(not(feature = "accelerated"))]
    let _ = (level, bind);

    Ok(Permutation::Generic)
}

static RESOLVED: OnceLock<Result<Permutation, SpongeError>> = OnceLock::new();
static GLOBAL: OnceLock<Permutation> = OnceLock::new();

/// Process-wide backend resolution, surfacing initialization failures.
///
/// The first call runs the probe and binds the backend; every later call
/// returns the same outcome, including a failed bind.
///
/// # Errors
///
/// Returns [`SpongeError::Initialization`] when the host passes the capability
/// probe but the accelerated kernel cannot be bound.
pub fn try_global() -> Result<Permutation, SpongeError> {
    RESOLVED.get_or_init(resolve).clone()
}

fn resolve() -> Result<Permutation, SpongeError> {
    let level = FeatureLevel::detect();
    let selected = select_for_level(level, bind_accelerated);

    #[cfg(feature = "tracing")]
    match &selected {
        Ok(permutation) => tracing::debug!(
            target: "sponge::dispatch",
            backend = %permutation.backend(),
            level = ?level,
            "resolved Keccak-f[1600] backend"
        ),
        Err(error) => tracing::debug!(
            target: "sponge::dispatch",
            level = ?level,
            %error,
            "Keccak-f[1600] backend resolution failed"
        ),
    }

    selected
}

/// Global permutation instance, initialized on first use.
///
/// Infallible counterpart of [`try_global`]: if the accelerated kernel fails
/// to bind after a passing probe, a `warn` event is logged and the generic
/// backend is used. Callers that must treat that failure as fatal use
/// [`try_global`] or the `try_new` constructors instead.
pub fn global() -> &'static Permutation {
    GLOBAL.get_or_init(|| match try_global() {
        Ok(permutation) => permutation,
        Err(error) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "sponge::dispatch",
                %error,
                "falling back to the generic Keccak-f[1600] permutation"
            );
            #[cfg(not(feature = "tracing"))]
            let _ = error;
            Permutation::Generic
        }
    })
}

/// Get the currently active permutation backend.
///
/// Useful for logging or diagnostics.
pub fn active_backend() -> Backend {
    global().backend()
}
