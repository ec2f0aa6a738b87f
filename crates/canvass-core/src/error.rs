// ── Core error types ──
//
// User-facing errors from canvass-core. These are NOT wire-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<canvass_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use std::collections::HashMap;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- sign in again")]
    SessionExpired,

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the platform at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// Search criteria could not be loaded. Filter screens render a
    /// terminal "no criteria available" state on this -- never a partial
    /// set of fields.
    #[error("No search criteria available: {reason}")]
    CriteriaUnavailable { reason: String },

    /// The backend rejected a mutation with per-field messages.
    #[error("Validation failed")]
    ValidationFailed {
        errors: HashMap<String, Vec<String>>,
    },

    /// A fetch-all would fan out past the page-count safeguard.
    #[error("Result set spans {pages} pages, more than the fetch-all limit of {limit}")]
    TooManyPages { pages: u32, limit: u32 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// First validation message per field, for inline display next to the
    /// offending form field. Empty for non-validation errors.
    pub fn field_errors(&self) -> HashMap<String, String> {
        match self {
            Self::ValidationFailed { errors } => errors
                .iter()
                .filter_map(|(field, msgs)| {
                    msgs.first().map(|m| (field.clone(), m.clone()))
                })
                .collect(),
            _ => HashMap::new(),
        }
    }

    /// Returns `true` when re-authenticating could resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::AuthenticationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<canvass_api::Error> for CoreError {
    fn from(err: canvass_api::Error) -> Self {
        match err {
            canvass_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            canvass_api::Error::SessionExpired => CoreError::SessionExpired,
            canvass_api::Error::CsrfMissing => CoreError::AuthenticationFailed {
                message: "CSRF token missing -- session not initialized".into(),
            },
            canvass_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_owned()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            canvass_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            canvass_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            canvass_api::Error::Validation { errors, .. } => {
                CoreError::ValidationFailed { errors }
            }
            canvass_api::Error::Api { status: 404, .. } => CoreError::NotFound {
                entity: "resource".into(),
                identifier: String::new(),
            },
            canvass_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            canvass_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}