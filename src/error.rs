//! Unified error handling for slirc-webserv.
//!
//! Request-level failures are [`ApiError`]s, which map onto HTTP responses.
//! Mutations of the network state report [`StateError`]s to the runtime
//! that drives them.

use crate::api::EntityKind;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ============================================================================
// API Errors (request handling)
// ============================================================================

/// Errors that end a query request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The supplied key did not match the configured secret.
    #[error("forbidden")]
    Forbidden,

    /// The identifier did not resolve to a live entity of the kind.
    #[error("no such {kind}: {identifier}")]
    NotFound {
        kind: EntityKind,
        identifier: String,
    },
}

impl ApiError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::NotFound { .. } => "not_found",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Denied requests get no body at all.
            Self::Forbidden => status.into_response(),
            Self::NotFound { .. } => {
                let body = serde_json::json!({
                    "error": self.to_string(),
                    "status": status.as_u16(),
                });
                (status, Json(body)).into_response()
            }
        }
    }
}

// ============================================================================
// State Errors (network mutation)
// ============================================================================

/// Errors from mutating the in-memory network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("uid in use: {0}")]
    UidInUse(String),

    #[error("no such user: {0}")]
    NoSuchUser(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("unknown server: {0}")]
    UnknownServer(String),

    #[error("sid in use: {0}")]
    SidInUse(String),

    #[error("server name in use: {0}")]
    ServerNameInUse(String),
}

impl StateError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::UidInUse(_) => "uid_in_use",
            Self::NoSuchUser(_) => "no_such_user",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::UnknownServer(_) => "unknown_server",
            Self::SidInUse(_) => "sid_in_use",
            Self::ServerNameInUse(_) => "server_name_in_use",
        }
    }
}
