// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge core: the API UI code calls.
//
// Outbound calls come in two typed forms, events and functions, each with its
// own delegate prefix. Inbound pushes are dispatched to callbacks registered
// under the raw, unprefixed name.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use neon_core::BridgeConfig;
use neon_core::error::NeonError;
use neon_core::types::{CallKind, RequestEnvelope};

use crate::logging::{LogGate, verbose};
use crate::registry::CallbackRegistry;
use crate::traits::QueryPrimitive;
use crate::transport::{InboundEntry, PendingCall, Transport, TransportAdapter};

/// One bridge per UI context. Clones share all state.
#[derive(Clone)]
pub struct Bridge {
    adapter: Arc<TransportAdapter>,
    registry: CallbackRegistry,
    log: LogGate,
    ready_timeout: Duration,
}

impl Bridge {
    pub fn new(transport: Transport, config: &BridgeConfig) -> Self {
        Self::with_registry(transport, CallbackRegistry::new(), config)
    }

    /// Build a bridge around an existing callback registry.
    pub fn with_registry(
        transport: Transport,
        registry: CallbackRegistry,
        config: &BridgeConfig,
    ) -> Self {
        let log = LogGate::new(config.verbose);
        let adapter = TransportAdapter::new(transport, registry.clone(), log.clone());
        Self {
            adapter: Arc::new(adapter),
            registry,
            log,
            ready_timeout: config.ready_timeout(),
        }
    }

    /// Fire-and-forget call to the native `OnInvoke_<name>` handler.
    ///
    /// Resolves once the host confirms receipt. An empty `name` rejects with
    /// code 101 without touching the transport.
    pub fn invoke_event(&self, name: &str, data: Value) -> PendingCall<()> {
        if name.is_empty() {
            return reject_missing_delegate(CallKind::Event);
        }
        let envelope = RequestEnvelope::new(CallKind::Event, name, data);
        verbose!(self.log, delegate = %envelope.delegate, data = %envelope.parameters, "invoke event");
        self.adapter.send_event(envelope)
    }

    /// [`Bridge::invoke_event`] with `{}` as data.
    pub fn invoke_event_empty(&self, name: &str) -> PendingCall<()> {
        self.invoke_event(name, empty_object())
    }

    /// Two-way call to the native `Invoke_<name>` function.
    ///
    /// Resolves to the parsed JSON reply; an unparseable reply rejects with
    /// code 102 and keeps the raw text.
    pub fn invoke_function(&self, name: &str, data: Value) -> PendingCall<Value> {
        self.invoke_function_as(name, data)
    }

    /// [`Bridge::invoke_function`] with `{}` as data.
    pub fn invoke_function_empty(&self, name: &str) -> PendingCall<Value> {
        self.invoke_function(name, empty_object())
    }

    /// Like [`Bridge::invoke_function`], deserializing the reply into `T`.
    ///
    /// A reply that is valid JSON of the wrong shape also rejects with 102.
    pub fn invoke_function_as<T>(&self, name: &str, data: Value) -> PendingCall<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if name.is_empty() {
            return reject_missing_delegate(CallKind::Function);
        }
        let envelope = RequestEnvelope::new(CallKind::Function, name, data);
        verbose!(self.log, delegate = %envelope.delegate, data = %envelope.parameters, "invoke function");
        self.adapter.send_function(envelope)
    }

    /// Register the callback the native side reaches by pushing to `name`.
    ///
    /// Replaces any earlier callback for the same name.
    pub fn on_invoke<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let name = name.into();
        verbose!(self.log, callback = %name, "registering callback");
        if self.registry.register(name.clone(), Arc::new(handler)) {
            verbose!(self.log, callback = %name, "replaced previous callback");
        }
    }

    /// Inbound entry point: deliver a push from the native side.
    pub fn invoke(&self, name: &str, raw: &str) {
        self.adapter.deliver(name, raw);
    }

    /// Handle for the host to keep in place of a global entry point.
    pub fn entry_point(&self) -> InboundEntry {
        InboundEntry::new(self.adapter.clone())
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.log.set_verbose(verbose);
    }

    pub fn is_verbose(&self) -> bool {
        self.log.is_verbose()
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    pub fn transport(&self) -> Transport {
        self.adapter.transport()
    }

    pub fn attach_transport(&self, primitive: Arc<dyn QueryPrimitive>) {
        self.adapter.attach(primitive);
    }

    pub fn detach_transport(&self) {
        self.adapter.detach();
    }

    /// Wait for the host to attach a transport, up to `timeout`.
    pub async fn wait_for_transport(&self, timeout: Duration) -> bool {
        self.adapter.wait_for_transport(timeout).await
    }

    /// [`Bridge::wait_for_transport`] with the configured ready timeout.
    pub async fn wait_until_ready(&self) -> bool {
        self.wait_for_transport(self.ready_timeout).await
    }
}

fn reject_missing_delegate<T: Send + 'static>(kind: CallKind) -> PendingCall<T> {
    error!(%kind, "bridge call failed: delegate is required");
    Box::pin(std::future::ready(Err(NeonError::DelegateRequired)))
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
