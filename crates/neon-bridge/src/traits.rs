// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The host capability the bridge is built on.
//
// The hosting browser control exposes a single query call that takes a JSON
// request string plus a success and a failure continuation. `QueryReply`
// models that continuation pair; settling it consumes it.

use tokio::sync::oneshot;

/// Host-supplied primitive that carries a request across the UI/native boundary.
///
/// Implementations must eventually call exactly one of [`QueryReply::success`]
/// or [`QueryReply::failure`]. They may do so from inside `query` or later,
/// from any thread. A reply that is dropped unsettled leaves the call pending.
pub trait QueryPrimitive: Send + Sync {
    fn query(&self, request: String, reply: QueryReply);
}

/// How the host settled a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Raw response string from the success continuation.
    Success(String),
    /// Code and message from the failure continuation, untouched.
    Failure { code: i32, message: String },
}

/// Success/failure continuation pair for one query.
#[derive(Debug)]
pub struct QueryReply {
    tx: oneshot::Sender<QueryOutcome>,
}

impl QueryReply {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<QueryOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Success continuation.
    pub fn success(self, response: impl Into<String>) {
        self.settle(QueryOutcome::Success(response.into()));
    }

    /// Failure continuation.
    pub fn failure(self, code: i32, message: impl Into<String>) {
        self.settle(QueryOutcome::Failure {
            code,
            message: message.into(),
        });
    }

    fn settle(self, outcome: QueryOutcome) {
        // The caller may have stopped awaiting; nothing to deliver to then.
        let _ = self.tx.send(outcome);
    }
}
