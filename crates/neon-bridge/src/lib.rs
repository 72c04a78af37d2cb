// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! NEON — UI side of the browser/native bridge.
//!
//! The UI issues two kinds of outbound call through the host's query
//! primitive: fire-and-forget events and value-returning functions. The
//! native side pushes messages back through an inbound entry point that
//! dispatches to named callbacks.
//!
//! The host capability is injected as a [`traits::QueryPrimitive`]; its
//! absence is an explicit [`transport::Transport::Unavailable`] rather than a
//! runtime probe.

pub mod bridge;
pub mod logging;
pub mod loopback;
pub mod registry;
pub mod traits;
pub mod transport;

pub use bridge::Bridge;
pub use loopback::LoopbackHost;
pub use registry::CallbackRegistry;
pub use traits::{QueryOutcome, QueryPrimitive, QueryReply};
pub use transport::{CallId, InboundEntry, PendingCall, Transport};
