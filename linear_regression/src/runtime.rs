//! Process-wide compute runtime.
//!
//! Nothing is set up implicitly: binaries call [`init`] once at startup, before
//! training. The pool lives until the process exits.

use std::{num::NonZeroUsize, sync::OnceLock};

use log::info;
use parking_lot::Mutex;
use regression_core::{RegressionErr, Result};

static RUNTIME: OnceLock<RuntimeConfig> = OnceLock::new();
static INIT: Mutex<()> = Mutex::new(());

/// The configuration of the compute runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Threads of the compute pool, defaults to one per logical core.
    pub threads: Option<NonZeroUsize>,
}

/// Initializes the compute pool used by parallel training.
///
/// Only the first call has an effect, later calls return `Ok` and keep the
/// configuration the runtime was started with.
///
/// # Returns
/// The configuration in effect, or `RegressionErr::Runtime` if the pool couldn't be built.
pub fn init(config: RuntimeConfig) -> Result<RuntimeConfig> {
    let _guard = INIT.lock();

    if let Some(active) = RUNTIME.get() {
        return Ok(*active);
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("regression-{i}"));

    if let Some(threads) = config.threads {
        builder = builder.num_threads(threads.get());
    }

    builder
        .build_global()
        .map_err(|e| RegressionErr::Runtime(e.to_string()))?;

    let active = *RUNTIME.get_or_init(|| config);
    info!(threads = rayon::current_num_threads(); "compute runtime initialized");
    Ok(active)
}

/// Returns the configuration of the runtime if it was initialized.
pub fn config() -> Option<RuntimeConfig> {
    RUNTIME.get().copied()
}
