use std::collections::HashMap;

use thiserror::Error;

/// Top-level error type for the `canvass-api` crate.
///
/// Covers every failure mode at the wire boundary: authentication and
/// session expiry, transport, validation rejections, and payload decoding.
/// `canvass-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An auth-required call came back 401 (cookie expired or revoked).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// A state-mutating call was attempted without an XSRF-TOKEN cookie.
    #[error("CSRF token missing -- fetch the CSRF cookie before mutating calls")]
    CsrfMissing,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Validation rejection: `4xx` with an `{errors: {field: [msgs]}}` body.
    #[error("Validation failed (HTTP {status})")]
    Validation {
        status: u16,
        errors: HashMap<String, Vec<String>>,
    },

    /// Any other non-success response, with whatever message the body had.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Authentication { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout() || e.is_connect())
    }

    /// The first validation message per field, in the shape forms display
    /// inline. Empty for non-validation errors.
    pub fn field_errors(&self) -> HashMap<String, String> {
        match self {
            Self::Validation { errors, .. } => errors
                .iter()
                .filter_map(|(field, msgs)| {
                    msgs.first().map(|m| (field.clone(), m.clone()))
                })
                .collect(),
            _ => HashMap::new(),
        }
    }
}
