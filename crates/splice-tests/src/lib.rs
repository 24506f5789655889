//! Integration test crate for Splice.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every splice crate to verify they work together.

/// Route `tracing` output through the test harness. `RUST_LOG` picks the
/// level (e.g. `RUST_LOG=splice_timeline=debug`); repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}


#[cfg(test)]
mod clipboard;

#[cfg(test)]
mod history;

#[cfg(test)]
mod playback;

#[cfg(test)]
mod compositor;

#[cfg(test)]
mod properties;
