// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error type for outbound bridge calls.

use thiserror::Error;

use crate::native_errors::NativeErrorCode;
use crate::types::ErrorPayload;

/// Reserved code: the call named no delegate.
pub const CODE_DELEGATE_REQUIRED: i32 = 101;

/// Reserved code: a function reply was not parseable JSON.
pub const CODE_MALFORMED_RESPONSE: i32 = 102;

/// Reserved code: the host's query primitive is not present.
pub const CODE_TRANSPORT_UNAVAILABLE: i32 = 103;

/// Why an outbound call was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NeonError {
    /// Caller misuse, rejected before the transport is touched.
    #[error("delegate is required")]
    DelegateRequired,

    /// A function reply could not be parsed. `raw` is the reply verbatim.
    #[error("failed to parse response: {raw}")]
    MalformedResponse { raw: String },

    /// No query primitive is attached (running outside the hosting browser control).
    #[error("query transport is not available")]
    TransportUnavailable,

    /// The native side reported failure.
    #[error("native call failed: {code} - {message}")]
    Native { code: i32, message: String },
}

impl NeonError {
    /// Numeric code as it appears in the rejection payload.
    pub fn code(&self) -> i32 {
        match self {
            NeonError::DelegateRequired => CODE_DELEGATE_REQUIRED,
            NeonError::MalformedResponse { .. } => CODE_MALFORMED_RESPONSE,
            NeonError::TransportUnavailable => CODE_TRANSPORT_UNAVAILABLE,
            NeonError::Native { code, .. } => *code,
        }
    }

    /// Message as it appears in the rejection payload.
    pub fn message(&self) -> String {
        match self {
            NeonError::DelegateRequired => "Delegate is required".into(),
            NeonError::MalformedResponse { .. } => "Failed to parse response".into(),
            NeonError::TransportUnavailable => "Query transport is not available".into(),
            NeonError::Native { message, .. } => message.clone(),
        }
    }

    /// The `{ errorCode, errorMessage }` shape.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload::new(self.code(), self.message())
    }

    /// Raw reply text kept for diagnostics on parse failures.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            NeonError::MalformedResponse { raw } => Some(raw),
            _ => None,
        }
    }

    /// Name of a native-reported code, when it is one the host is known to use.
    pub fn native_kind(&self) -> Option<NativeErrorCode> {
        match self {
            NeonError::Native { code, .. } => NativeErrorCode::from_code(*code),
            _ => None,
        }
    }
}

impl From<ErrorPayload> for NeonError {
    fn from(payload: ErrorPayload) -> Self {
        match payload.error_code {
            CODE_DELEGATE_REQUIRED => NeonError::DelegateRequired,
            CODE_TRANSPORT_UNAVAILABLE => NeonError::TransportUnavailable,
            code => NeonError::Native {
                code,
                message: payload.error_message,
            },
        }
    }
}

/// Alias used throughout the bridge.
pub type Result<T> = std::result::Result<T, NeonError>;
