//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text and deterministic exit codes.

use miette::Diagnostic;
use thiserror::Error;

use canvass_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const VALIDATION: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the platform at {url}")]
    #[diagnostic(
        code(canvass::connection_failed),
        help(
            "Check that the platform is running and accessible.\n\
             URL: {url}\n\
             Try: canvass whoami --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(canvass::timeout),
        help("The platform did not answer in time. Raise --timeout or try again.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(canvass::auth_failed),
        help(
            "Verify your email and password.\n\
             Set CANVASS_PASSWORD or add a password to your profile."
        )
    )]
    AuthFailed { message: String },

    #[error("Session expired")]
    #[diagnostic(
        code(canvass::session_expired),
        help("The session cookie is no longer valid. Run the command again to re-login.")
    )]
    SessionExpired,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(canvass::no_credentials),
        help(
            "Add email (and optionally password) to the profile in your\n\
             config file, or set CANVASS_EMAIL / CANVASS_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("No configuration found")]
    #[diagnostic(
        code(canvass::no_config),
        help(
            "Create a config file at {path} with a [profiles.default] section,\n\
             or pass --url and --email directly."
        )
    )]
    NoConfig { path: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{entity} '{identifier}' not found")]
    #[diagnostic(code(canvass::not_found))]
    NotFound { entity: String, identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("The platform rejected the request:\n{details}")]
    #[diagnostic(code(canvass::validation_failed))]
    ValidationFailed { details: String },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(canvass::invalid_argument))]
    Validation { field: String, reason: String },

    // ── Fallthrough ──────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(canvass::api_error))]
    Api { message: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(canvass::cancelled))]
    Cancelled,
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::SessionExpired | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ValidationFailed { .. } | Self::Validation { .. } => exit_code::VALIDATION,
            Self::NoConfig { .. } => exit_code::USAGE,
            Self::Api { .. } | Self::Cancelled => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::SessionExpired => Self::SessionExpired,
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::NotFound { entity, identifier } => Self::NotFound { entity, identifier },
            CoreError::ValidationFailed { .. } => {
                // Field -> first message, one line each, stable order.
                let mut fields: Vec<(String, String)> =
                    err.field_errors().into_iter().collect();
                fields.sort();
                let details = fields
                    .into_iter()
                    .map(|(field, message)| format!("  {field}: {message}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                Self::ValidationFailed { details }
            }
            CoreError::CriteriaUnavailable { reason } => Self::Api {
                message: format!("No search criteria available: {reason}"),
            },
            CoreError::TooManyPages { pages, limit } => Self::Api {
                message: format!(
                    "Result set spans {pages} pages (limit {limit}); narrow the filter or paginate"
                ),
            },
            CoreError::Api { message, .. } => Self::Api { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Api { message },
        }
    }
}
