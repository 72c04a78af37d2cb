// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport adapter: hands request envelopes to the host's query primitive
// and turns its continuations into settled futures, and routes inbound
// pushes from the host to registered callbacks.
//
// Calls are submitted eagerly, at the moment `send_*` is called. The returned
// future only waits for the continuation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{oneshot, watch};
use tracing::{debug, error};
use uuid::Uuid;

use neon_core::error::{NeonError, Result};
use neon_core::types::RequestEnvelope;

use crate::logging::{LogGate, verbose};
use crate::registry::CallbackRegistry;
use crate::traits::{QueryOutcome, QueryPrimitive, QueryReply};

/// A call awaiting its native response. Settles exactly once; never times out.
pub type PendingCall<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// Correlates the log lines of one outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the host's query primitive is present.
#[derive(Clone, Default)]
pub enum Transport {
    Available(Arc<dyn QueryPrimitive>),
    #[default]
    Unavailable,
}

impl Transport {
    pub fn available(primitive: Arc<dyn QueryPrimitive>) -> Self {
        Transport::Available(primitive)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Transport::Available(_))
    }
}

impl From<Option<Arc<dyn QueryPrimitive>>> for Transport {
    fn from(primitive: Option<Arc<dyn QueryPrimitive>>) -> Self {
        primitive.map_or(Transport::Unavailable, Transport::Available)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Available(_) => f.write_str("Transport::Available"),
            Transport::Unavailable => f.write_str("Transport::Unavailable"),
        }
    }
}

/// Owns the transport slot and the inbound dispatch path.
pub struct TransportAdapter {
    slot: watch::Sender<Transport>,
    registry: CallbackRegistry,
    log: LogGate,
}

impl TransportAdapter {
    pub fn new(transport: Transport, registry: CallbackRegistry, log: LogGate) -> Self {
        let (slot, _) = watch::channel(transport);
        Self {
            slot,
            registry,
            log,
        }
    }

    /// Snapshot of the current transport.
    pub fn transport(&self) -> Transport {
        self.slot.borrow().clone()
    }

    /// Install (or replace) the host's query primitive.
    pub fn attach(&self, primitive: Arc<dyn QueryPrimitive>) {
        self.slot.send_replace(Transport::Available(primitive));
        verbose!(self.log, "query transport attached");
    }

    /// Remove the query primitive. Calls already submitted are unaffected.
    pub fn detach(&self) {
        self.slot.send_replace(Transport::Unavailable);
        verbose!(self.log, "query transport detached");
    }

    /// Wait up to `timeout` for a primitive to be attached.
    ///
    /// Resolves `false` on timeout instead of failing; callers decide what a
    /// missing host means for them.
    pub async fn wait_for_transport(&self, timeout: Duration) -> bool {
        let mut rx = self.slot.subscribe();
        let ready = tokio::time::timeout(timeout, rx.wait_for(Transport::is_available))
            .await
            .map(|seen| seen.is_ok())
            .unwrap_or(false);
        if !ready {
            error!(
                timeout_ms = timeout.as_millis() as u64,
                "query transport did not become available"
            );
        }
        ready
    }

    /// Submit an event envelope. Resolves with no value on any success response.
    pub fn send_event(&self, envelope: RequestEnvelope) -> PendingCall<()> {
        let call_id = CallId::new();
        let log = self.log.clone();
        let delegate = envelope.delegate.clone();
        let submitted = self.submit(call_id, &envelope);

        Box::pin(async move {
            match await_outcome(submitted?, call_id, &delegate).await {
                QueryOutcome::Success(_) => {
                    verbose!(log, %call_id, %delegate, "event call succeeded");
                    Ok(())
                }
                QueryOutcome::Failure { code, message } => {
                    error!(%call_id, %delegate, code, %message, "event call failed");
                    Err(NeonError::Native { code, message })
                }
            }
        })
    }

    /// Submit a function envelope. Resolves with the reply parsed as `T`.
    pub fn send_function<T>(&self, envelope: RequestEnvelope) -> PendingCall<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let call_id = CallId::new();
        let log = self.log.clone();
        let delegate = envelope.delegate.clone();
        let submitted = self.submit(call_id, &envelope);

        Box::pin(async move {
            match await_outcome(submitted?, call_id, &delegate).await {
                QueryOutcome::Success(raw) => match serde_json::from_str::<T>(&raw) {
                    Ok(value) => {
                        verbose!(log, %call_id, %delegate, response = %raw, "function call succeeded");
                        Ok(value)
                    }
                    Err(e) => {
                        error!(%call_id, %delegate, response = %raw, error = %e, "failed to parse function response");
                        Err(NeonError::MalformedResponse { raw })
                    }
                },
                QueryOutcome::Failure { code, message } => {
                    error!(%call_id, %delegate, code, %message, "function call failed");
                    Err(NeonError::Native { code, message })
                }
            }
        })
    }

    /// Hand the envelope to the host, or report that there is no host.
    fn submit(
        &self,
        call_id: CallId,
        envelope: &RequestEnvelope,
    ) -> Result<oneshot::Receiver<QueryOutcome>> {
        let Transport::Available(primitive) = self.transport() else {
            error!(%call_id, delegate = %envelope.delegate, "query transport is not available");
            return Err(NeonError::TransportUnavailable);
        };

        verbose!(
            self.log,
            %call_id,
            kind = %envelope.kind,
            delegate = %envelope.delegate,
            parameters = %envelope.parameters,
            "submitting query"
        );
        let (reply, rx) = QueryReply::channel();
        primitive.query(envelope.to_wire(), reply);
        Ok(rx)
    }

    /// Route an inbound push to its callback.
    ///
    /// Never fails: unparseable data and unknown names are logged and dropped.
    pub fn deliver(&self, name: &str, raw: &str) {
        let data: Value = match serde_json::from_str(raw) {
            Ok(data) => data,
            Err(e) => {
                error!(callback = name, raw, error = %e, "inbound push dropped: data is not JSON parseable");
                return;
            }
        };

        let Some(callback) = self.registry.get(name) else {
            error!(callback = name, "inbound push dropped: callback not found");
            return;
        };

        verbose!(self.log, callback = name, data = %data, "invoking web callback");
        callback(data);
    }
}

/// Wait for the host's continuation.
///
/// A reply dropped without settling means the host will never answer; the
/// call then stays pending, same as a host that never calls back.
async fn await_outcome(
    rx: oneshot::Receiver<QueryOutcome>,
    call_id: CallId,
    delegate: &str,
) -> QueryOutcome {
    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => {
            error!(%call_id, delegate, "host dropped the reply unsettled; call will stay pending");
            std::future::pending().await
        }
    }
}

/// Cloneable handle the host keeps to push messages into the UI.
///
/// Stands in for the fixed global entry point: whoever holds it can call
/// [`InboundEntry::invoke`] without further coordination.
#[derive(Clone)]
pub struct InboundEntry {
    adapter: Arc<TransportAdapter>,
}

impl InboundEntry {
    pub(crate) fn new(adapter: Arc<TransportAdapter>) -> Self {
        Self { adapter }
    }

    /// Deliver `raw` (a JSON document) to the callback registered as `name`.
    pub fn invoke(&self, name: &str, raw: &str) {
        debug!(callback = name, "inbound push");
        self.adapter.deliver(name, raw);
    }
}

impl std::fmt::Debug for InboundEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundEntry").finish_non_exhaustive()
    }
}
