// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error codes the native host uses when it rejects a query.
//
// The bridge never rewrites these; the catalogue only gives them names so UI
// code can branch on them without magic numbers.

/// Failure codes reported by the native message handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeErrorCode {
    Unknown = 0,
    InvalidJson = 1,
    MissingDelegateTypeField = 2,
    InvalidDelegateType = 3,
    MissingDelegateField = 4,
    MissingParametersField = 5,
    DelegateNotFound = 6,
    UnsupportedPropertyType = 7,
    InvalidInput = 8,
    UnexpectedParameterType = 9,
    MissingParameter = 10,
}

impl NativeErrorCode {
    /// Look up a code. `None` for anything outside the catalogue.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => NativeErrorCode::Unknown,
            1 => NativeErrorCode::InvalidJson,
            2 => NativeErrorCode::MissingDelegateTypeField,
            3 => NativeErrorCode::InvalidDelegateType,
            4 => NativeErrorCode::MissingDelegateField,
            5 => NativeErrorCode::MissingParametersField,
            6 => NativeErrorCode::DelegateNotFound,
            7 => NativeErrorCode::UnsupportedPropertyType,
            8 => NativeErrorCode::InvalidInput,
            9 => NativeErrorCode::UnexpectedParameterType,
            10 => NativeErrorCode::MissingParameter,
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// The message the host sends alongside the code.
    pub fn message(self) -> &'static str {
        match self {
            NativeErrorCode::Unknown => "Unknown error",
            NativeErrorCode::InvalidJson => "Invalid JSON data",
            NativeErrorCode::MissingDelegateTypeField => "Missing delegate type field",
            NativeErrorCode::InvalidDelegateType => "Invalid delegate type",
            NativeErrorCode::MissingDelegateField => "Missing delegate field",
            NativeErrorCode::MissingParametersField => "Missing parameters field",
            NativeErrorCode::DelegateNotFound => "Delegate not found",
            NativeErrorCode::UnsupportedPropertyType => "Unsupported property type",
            NativeErrorCode::InvalidInput => "Invalid input",
            NativeErrorCode::UnexpectedParameterType => "Unexpected parameter type",
            NativeErrorCode::MissingParameter => "Missing parameter",
        }
    }
}

impl std::fmt::Display for NativeErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}
