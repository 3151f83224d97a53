// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the CAMARA bridge.

use thiserror::Error;

use crate::types::{Capability, ErrorInfo, StatusInfo};

/// The primary error type used across all adapter traits and engine operations.
///
/// Every variant carries structured context (backend, capability, HTTP status)
/// so callers can map it to a stable CAMARA error code with
/// [`BridgeError::error_info`] instead of parsing messages.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Malformed or unsupported input, rejected before dispatch.
    #[error("validation failed for {backend}: {}", .reasons.join("; "))]
    Validation { backend: String, reasons: Vec<String> },

    /// The operation is not declared by the backend adapter.
    #[error("functionality '{capability}' is not supported by {backend}")]
    CapabilityNotSupported {
        backend: String,
        capability: Capability,
    },

    /// The device carries no usable network identifier.
    #[error(
        "no usable device identifier: expected an IPv4 address, IPv6 address, phone number or NAI"
    )]
    MissingIdentifier,

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}: {}", .message.as_deref().unwrap_or(.body.as_str()))]
    BackendHttp {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// The backend could not be reached (DNS, refused connection, timeout).
    #[error("backend unreachable at {url}: {reason}")]
    BackendUnreachable { url: String, reason: String },

    /// The backend answered 2xx but the body lacks an expected field.
    #[error("malformed backend response: {detail}")]
    MalformedBackendResponse { detail: String },

    /// No adapter is registered under the requested name.
    #[error("unknown backend `{name}`, available: [{}]", .available.join(", "))]
    UnknownBackend {
        name: String,
        available: Vec<String>,
    },

    /// The operation conflicts with the current state of the resource.
    #[error("{message}")]
    Conflict { code: String, message: String },

    /// The resource is not tracked by this bridge.
    #[error("{resource} `{id}` not found")]
    NotFound { resource: String, id: String },

    /// Configuration errors (invalid URL, missing service identifier).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Shorthand for a single-reason validation failure.
    pub fn validation(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::Validation {
            backend: backend.into(),
            reasons: vec![reason.into()],
        }
    }

    /// Whether the error was produced locally, without any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            BridgeError::Validation { .. }
                | BridgeError::CapabilityNotSupported { .. }
                | BridgeError::MissingIdentifier
                | BridgeError::UnknownBackend { .. }
                | BridgeError::Conflict { .. }
                | BridgeError::NotFound { .. }
                | BridgeError::Config(_)
        )
    }

    /// Maps this error to the CAMARA `{status, code, message}` envelope.
    pub fn error_info(&self) -> ErrorInfo {
        let (status, code) = match self {
            BridgeError::Validation { .. } | BridgeError::MissingIdentifier => {
                (400, "INVALID_ARGUMENT".to_string())
            }
            BridgeError::CapabilityNotSupported { .. } => (501, "NOT_IMPLEMENTED".to_string()),
            BridgeError::BackendHttp { status, .. } => {
                (*status, error_code_for_status(*status).to_string())
            }
            BridgeError::BackendUnreachable { .. } => (503, "UNAVAILABLE".to_string()),
            BridgeError::MalformedBackendResponse { .. } => (502, "BAD_GATEWAY".to_string()),
            BridgeError::UnknownBackend { .. } => (400, "INVALID_ARGUMENT".to_string()),
            BridgeError::Conflict { code, .. } => (409, code.clone()),
            BridgeError::NotFound { .. } => (404, "NOT_FOUND".to_string()),
            BridgeError::Config(_) | BridgeError::Internal(_) => {
                (500, "INTERNAL".to_string())
            }
        };
        ErrorInfo {
            status,
            code,
            message: self.to_string(),
        }
    }

    /// The CAMARA envelope as the backend reported it.
    ///
    /// A backend body that already is an `ErrorInfo` is passed through.
    /// Otherwise the status maps to a CAMARA code and the backend's own
    /// message is kept when it sent one.
    pub fn upstream_error_info(&self) -> ErrorInfo {
        match self {
            BridgeError::BackendHttp { status, message, body } => {
                if let Ok(info) = serde_json::from_str::<ErrorInfo>(body) {
                    return info;
                }
                ErrorInfo {
                    status: *status,
                    code: error_code_for_status(*status).to_string(),
                    message: message.clone().unwrap_or_else(|| self.to_string()),
                }
            }
            _ => self.error_info(),
        }
    }

    /// The session status reason implied by a backend failure, if any.
    pub fn status_info(&self) -> Option<StatusInfo> {
        match self {
            BridgeError::BackendHttp { status, .. } => match *status {
                410 => Some(StatusInfo::DeleteRequested),
                408 | 504 => Some(StatusInfo::NetworkTerminated),
                s if s >= 500 => Some(StatusInfo::NetworkTerminated),
                _ => None,
            },
            BridgeError::BackendUnreachable { .. } => Some(StatusInfo::NetworkTerminated),
            _ => None,
        }
    }
}

/// CAMARA error code for a backend HTTP status.
pub fn error_code_for_status(status: u16) -> &'static str {
    match status {
        400 => "INVALID_ARGUMENT",
        401 => "UNAUTHENTICATED",
        403 => "PERMISSION_DENIED",
        404 => "NOT_FOUND",
        409 => "CONFLICT",
        410 => "GONE",
        413 => "REQUEST_TOO_LARGE",
        415 => "UNSUPPORTED_MEDIA_TYPE",
        422 => "UNPROCESSABLE_ENTITY",
        429 => "TOO_MANY_REQUESTS",
        _ => "INTERNAL_ERROR",
    }
}
