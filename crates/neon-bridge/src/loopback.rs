// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process host for standalone runs and tests, where no engine is present.
//
// Requests are decoded and validated the way the native message handler
// does it, so a UI exercised against the loopback sees the same error codes
// the engine would send. Handlers are registered per logical name and kind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};

use neon_core::native_errors::NativeErrorCode;
use neon_core::types::{CallKind, ErrorPayload, RequestEnvelope};

use crate::registry::lock;
use crate::traits::{QueryPrimitive, QueryReply};
use crate::transport::InboundEntry;

/// Handler for a `function` delegate: parameters in, reply value or error out.
pub type FunctionHandler = Arc<dyn Fn(&Value) -> Result<Value, ErrorPayload> + Send + Sync>;

/// Handler for an `event` delegate.
pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Stand-in for the native side of the bridge.
#[derive(Default)]
pub struct LoopbackHost {
    /// Keyed by wire delegate (`Invoke_<name>` / `OnInvoke_<name>`).
    functions: Mutex<HashMap<String, FunctionHandler>>,
    events: Mutex<HashMap<String, EventHandler>>,
    requests: Mutex<Vec<RequestEnvelope>>,
    ui: Mutex<Option<InboundEntry>>,
}

impl LoopbackHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer function calls to `name`.
    pub fn function<F>(&self, name: &str, handler: F) -> &Self
    where
        F: Fn(&Value) -> Result<Value, ErrorPayload> + Send + Sync + 'static,
    {
        lock(&self.functions).insert(CallKind::Function.wire_delegate(name), Arc::new(handler));
        self
    }

    /// Handle event calls to `name`.
    pub fn event<F>(&self, name: &str, handler: F) -> &Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        lock(&self.events).insert(CallKind::Event.wire_delegate(name), Arc::new(handler));
        self
    }

    /// Every request that decoded successfully, oldest first.
    pub fn requests(&self) -> Vec<RequestEnvelope> {
        lock(&self.requests).clone()
    }

    /// Keep the UI's entry point so the host can push to it.
    pub fn connect(&self, entry: InboundEntry) {
        *lock(&self.ui) = Some(entry);
    }

    /// Push `data` to the UI callback `name`. Returns `false` when no UI is connected.
    pub fn push(&self, name: &str, data: &Value) -> bool {
        self.push_raw(name, &data.to_string())
    }

    /// Push a raw string, whether or not it is valid JSON.
    pub fn push_raw(&self, name: &str, raw: &str) -> bool {
        // Clone out so the UI callback runs without the host locked.
        let Some(entry) = lock(&self.ui).clone() else {
            warn!(callback = name, "loopback push with no UI connected");
            return false;
        };
        entry.invoke(name, raw);
        true
    }

    fn call_function(&self, envelope: &RequestEnvelope, reply: QueryReply) {
        let handler = lock(&self.functions).get(&envelope.delegate).cloned();
        let Some(handler) = handler else {
            return fail(reply, &envelope.delegate, NativeErrorCode::DelegateNotFound);
        };
        match handler(&envelope.parameters) {
            Ok(value) => reply.success(value.to_string()),
            Err(payload) => reply.failure(payload.error_code, payload.error_message),
        }
    }

    fn call_event(&self, envelope: &RequestEnvelope, reply: QueryReply) {
        let handler = lock(&self.events).get(&envelope.delegate).cloned();
        let Some(handler) = handler else {
            return fail(reply, &envelope.delegate, NativeErrorCode::DelegateNotFound);
        };
        handler(&envelope.parameters);
        reply.success("");
    }
}

impl QueryPrimitive for LoopbackHost {
    fn query(&self, request: String, reply: QueryReply) {
        let envelope = match RequestEnvelope::from_wire(&request) {
            Ok(envelope) => envelope,
            Err(code) => {
                warn!(%request, "loopback rejected malformed request");
                let payload = ErrorPayload::from(code);
                return reply.failure(payload.error_code, payload.error_message);
            }
        };

        debug!(kind = %envelope.kind, delegate = %envelope.delegate, "loopback query");
        lock(&self.requests).push(envelope.clone());

        match envelope.kind {
            CallKind::Function => self.call_function(&envelope, reply),
            CallKind::Event => self.call_event(&envelope, reply),
        }
    }
}

fn fail(reply: QueryReply, delegate: &str, code: NativeErrorCode) {
    warn!(delegate, %code, "loopback query failed");
    reply.failure(code.code(), code.message());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use neon_core::BridgeConfig;
    use neon_core::error::NeonError;

    use crate::bridge::Bridge;
    use crate::transport::Transport;

    fn connected() -> (Bridge, Arc<LoopbackHost>) {
        let host = Arc::new(LoopbackHost::new());
        let bridge = Bridge::new(Transport::available(host.clone()), &BridgeConfig::default());
        host.connect(bridge.entry_point());
        (bridge, host)
    }

    #[tokio::test]
    async fn audio_settings_round_trip() {
        let (bridge, host) = connected();
        host.function("GetAudioSettings", |_| {
            Ok(json!({"masterVolume": 1.0, "musicVolume": 0.8}))
        });

        let settings = bridge
            .invoke_function("GetAudioSettings", json!({}))
            .await
            .unwrap();
        assert_eq!(settings, json!({"masterVolume": 1.0, "musicVolume": 0.8}));
    }

    #[tokio::test]
    async fn event_handler_sees_parameters() {
        let (bridge, host) = connected();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        host.event("ApplySettings", move |params| {
            *sink.lock().unwrap() = Some(params.clone());
        });

        bridge
            .invoke_event("ApplySettings", json!({"vsync": false}))
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(json!({"vsync": false})));
    }

    #[tokio::test]
    async fn namespaces_do_not_interchange() {
        let (bridge, host) = connected();
        host.function("Quit", |_| Ok(Value::Null));

        let err = bridge.invoke_event_empty("Quit").await.unwrap_err();
        assert_eq!(err.native_kind(), Some(NativeErrorCode::DelegateNotFound));
        assert_eq!(bridge.invoke_function_empty("Quit").await, Ok(Value::Null));
    }

    #[tokio::test]
    async fn handler_error_reaches_caller() {
        let (bridge, host) = connected();
        host.function("SetResolution", |params| {
            if params.get("width").is_none() {
                return Err(ErrorPayload::new(
                    NativeErrorCode::MissingParameter.code(),
                    "Missing parameter: width",
                ));
            }
            Ok(json!(true))
        });

        let err = bridge
            .invoke_function("SetResolution", json!({"height": 1080}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            NeonError::Native {
                code: 10,
                message: "Missing parameter: width".into()
            }
        );
    }

    #[tokio::test]
    async fn non_object_parameters_are_rejected_like_the_engine() {
        let (bridge, _host) = connected();
        let err = bridge
            .invoke_function("GetAudioSettings", json!([1, 2]))
            .await
            .unwrap_err();
        assert_eq!(err.native_kind(), Some(NativeErrorCode::MissingParametersField));
    }

    #[test]
    fn malformed_request_gets_invalid_json() {
        let host = LoopbackHost::new();
        let (reply, mut rx) = QueryReply::channel();
        host.query("{{".into(), reply);
        assert_eq!(
            rx.try_recv().unwrap(),
            crate::traits::QueryOutcome::Failure {
                code: 1,
                message: "Invalid JSON data".into()
            }
        );
        assert!(host.requests().is_empty());
    }

    #[tokio::test]
    async fn requests_are_recorded() {
        let (bridge, host) = connected();
        host.event("Pause", |_| {});
        bridge.invoke_event_empty("Pause").await.unwrap();
        let _ = bridge.invoke_function_empty("Missing").await;

        let delegates: Vec<String> = host.requests().into_iter().map(|r| r.delegate).collect();
        assert_eq!(delegates, vec!["OnInvoke_Pause", "Invoke_Missing"]);
    }

    #[test]
    fn push_reaches_ui_callbacks() {
        let (bridge, host) = connected();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bridge.on_invoke("OnFpsUpdate", move |data| sink.lock().unwrap().push(data));

        assert!(host.push("OnFpsUpdate", &json!({"fps": 120})));
        assert!(host.push_raw("OnFpsUpdate", "garbage"));
        assert!(host.push("OnFpsUpdate", &json!({"fps": 118})));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![json!({"fps": 120}), json!({"fps": 118})]
        );
    }

    #[test]
    fn push_without_ui_is_refused() {
        let host = LoopbackHost::new();
        assert!(!host.push("OnFpsUpdate", &json!({})));
    }
}
