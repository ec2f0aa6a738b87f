// ── Runtime connection configuration ──
//
// These types describe *how* to reach the campaign platform. They carry
// credential data and connection tuning, but never touch disk -- the CLI
// builds a `ConsoleConfig` from its profile files and hands it in.

use secrecy::SecretString;
use url::Url;

/// Admin sign-in credentials for the session endpoints.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default -- the platform runs behind a
    /// real certificate.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// Configuration for one platform connection.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Platform root URL (e.g. `https://platform.example.com`).
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: std::time::Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
        }
    }
}
