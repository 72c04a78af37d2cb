// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log verbosity gate and subscriber setup.
//
// Informational lines go through the gate; errors are always emitted. The
// gate never influences control flow.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use neon_core::BridgeConfig;

/// Shared on/off switch for informational bridge logging.
#[derive(Debug, Clone, Default)]
pub struct LogGate(Arc<AtomicBool>);

impl LogGate {
    pub fn new(verbose: bool) -> Self {
        Self(Arc::new(AtomicBool::new(verbose)))
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.0.store(verbose, Ordering::Relaxed);
    }

    pub fn is_verbose(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// `tracing::info!` behind a [`LogGate`].
macro_rules! verbose {
    ($gate:expr, $($arg:tt)+) => {
        if $gate.is_verbose() {
            ::tracing::info!($($arg)+);
        }
    };
}

pub(crate) use verbose;

/// Install a fmt subscriber filtered by `RUST_LOG`, or by `config.log_filter`
/// when that is unset.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(config: &BridgeConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .try_init()
        .is_ok()
}
