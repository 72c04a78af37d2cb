// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// NEON — Wire types, error definitions and configuration shared by the UI
// side of the bridge and any in-process host that answers it.

pub mod config;
pub mod error;
pub mod native_errors;
pub mod types;

pub use config::BridgeConfig;
pub use error::NeonError;
pub use native_errors::NativeErrorCode;
pub use types::*;
