// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire types for the UI -> native request envelope and the rejection payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::native_errors::NativeErrorCode;

/// Delegate prefix for fire-and-forget event calls.
pub const EVENT_PREFIX: &str = "OnInvoke_";

/// Delegate prefix for two-way function calls.
pub const FUNCTION_PREFIX: &str = "Invoke_";

/// The two outbound call modes.
///
/// The same logical name maps to two disjoint native namespaces, one per
/// kind. A delegate registered natively as a function is never reachable as
/// an event and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// Native side runs a handler; success only confirms receipt.
    Event,
    /// Native side computes and returns a JSON value.
    Function,
}

impl CallKind {
    /// Prefix prepended to the logical name before it goes on the wire.
    pub fn prefix(self) -> &'static str {
        match self {
            CallKind::Event => EVENT_PREFIX,
            CallKind::Function => FUNCTION_PREFIX,
        }
    }

    /// Wire-level delegate for a logical name, e.g. `Invoke_GetAudioSettings`.
    pub fn wire_delegate(self, name: &str) -> String {
        format!("{}{name}", self.prefix())
    }

    /// The `type` string used in the envelope.
    pub fn as_str(self) -> &'static str {
        match self {
            CallKind::Event => "event",
            CallKind::Function => "function",
        }
    }
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound message handed to the host's query primitive.
///
/// Serialized as `{ "type": ..., "delegate": ..., "parameters": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(rename = "type")]
    pub kind: CallKind,
    /// Prefixed delegate name.
    pub delegate: String,
    pub parameters: Value,
}

impl RequestEnvelope {
    /// Build an envelope for a logical delegate name, applying the kind's prefix.
    pub fn new(kind: CallKind, name: &str, parameters: Value) -> Self {
        Self {
            kind,
            delegate: kind.wire_delegate(name),
            parameters,
        }
    }

    /// Serialize to the JSON string submitted to the host.
    pub fn to_wire(&self) -> String {
        let mut object = serde_json::Map::with_capacity(3);
        object.insert("type".into(), Value::String(self.kind.as_str().into()));
        object.insert("delegate".into(), Value::String(self.delegate.clone()));
        object.insert("parameters".into(), self.parameters.clone());
        Value::Object(object).to_string()
    }

    /// Decode and validate a request on the host side.
    ///
    /// Checks run in the same order the native message handler applies them,
    /// so the first missing piece decides the reported code.
    pub fn from_wire(raw: &str) -> std::result::Result<Self, NativeErrorCode> {
        let value: Value = serde_json::from_str(raw).map_err(|_| NativeErrorCode::InvalidJson)?;
        let Value::Object(mut object) = value else {
            return Err(NativeErrorCode::InvalidJson);
        };

        let kind = match object.get("type").and_then(Value::as_str) {
            None | Some("") => return Err(NativeErrorCode::MissingDelegateTypeField),
            Some("event") => CallKind::Event,
            Some("function") => CallKind::Function,
            Some(_) => return Err(NativeErrorCode::InvalidDelegateType),
        };

        let delegate = match object.get("delegate").and_then(Value::as_str) {
            None | Some("") => return Err(NativeErrorCode::MissingDelegateField),
            Some(delegate) => delegate.to_owned(),
        };

        let parameters = match object.remove("parameters") {
            Some(parameters @ Value::Object(_)) => parameters,
            _ => return Err(NativeErrorCode::MissingParametersField),
        };

        Ok(Self {
            kind,
            delegate,
            parameters,
        })
    }

    /// Delegate name with the kind's prefix removed.
    pub fn logical_name(&self) -> &str {
        self.delegate
            .strip_prefix(self.kind.prefix())
            .unwrap_or(&self.delegate)
    }
}

/// Rejection shape surfaced to callers: `{ "errorCode": ..., "errorMessage": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error_code: i32,
    pub error_message: String,
}

impl ErrorPayload {
    pub fn new(error_code: i32, error_message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
        }
    }
}

impl From<NativeErrorCode> for ErrorPayload {
    fn from(code: NativeErrorCode) -> Self {
        Self::new(code.code(), code.message())
    }
}
