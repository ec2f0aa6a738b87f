// Admin API HTTP client
//
// Wraps `reqwest::Client` with session-cookie auth, CSRF header injection
// for state-mutating verbs, and defensive error-body parsing. Endpoint
// modules (campaigns, prospects, etc.) are implemented as inherent methods
// in separate files to keep this module focused on transport mechanics.

use std::collections::HashMap;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Name of the CSRF cookie the backend sets and the header it expects back.
const XSRF_COOKIE: &str = "XSRF-TOKEN";
const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Raw HTTP client for the campaign-platform admin API.
///
/// Auth is a session cookie plus an `X-XSRF-TOKEN` header mirrored from the
/// `XSRF-TOKEN` cookie on every state-mutating call. A `401` on any call
/// maps to [`Error::SessionExpired`] -- callers decide what re-login looks
/// like on their surface.
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl AdminClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). `base_url` is the
    /// backend root, e.g. `https://platform.example.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let jar = config
            .cookie_jar
            .clone()
            .unwrap_or_else(|| Arc::new(Jar::default()));
        let http = config.build_client()?;
        Ok(Self { http, base_url, jar })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL / CSRF helpers ──────────────────────────────────────────

    /// Build a full URL for an API path like `api/campaigns`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(Error::InvalidUrl)
    }

    /// Read the current CSRF token out of the cookie jar, percent-decoded.
    ///
    /// The backend sets `XSRF-TOKEN` URL-encoded; the header must carry the
    /// decoded value or the session middleware rejects the request.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let cookies = header.to_str().ok()?;
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name == XSRF_COOKIE {
                Some(percent_decode_str(value).decode_utf8_lossy().into_owned())
            } else {
                None
            }
        })
    }

    fn require_csrf(&self) -> Result<String, Error> {
        self.csrf_token().ok_or(Error::CsrfMissing)
    }

    // ── Request helpers ─────────────────────────────────────────────

    /// Send a GET request with query pairs and decode the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::handle_response(resp).await
    }

    /// Send a POST with JSON body (CSRF header attached) and decode the
    /// response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        let token = self.require_csrf()?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .query(query)
            .header(XSRF_HEADER, token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::handle_response(resp).await
    }

    /// Send a PUT with JSON body (CSRF header attached) and decode the
    /// response.
    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        let token = self.require_csrf()?;
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .header(XSRF_HEADER, token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::handle_response(resp).await
    }

    /// Send a DELETE (CSRF header attached). The backend answers deletes
    /// with an empty body, so there is nothing to decode.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.api_url(path)?;
        let token = self.require_csrf()?;
        debug!("DELETE {}", url);

        let resp = self
            .http
            .delete(url)
            .header(XSRF_HEADER, token)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::parse_error_body(status.as_u16(), &body));
        }
        Ok(())
    }

    /// How many records match `query`. Asks for `per_page=1` and reads the
    /// count from pagination metadata rather than transferring rows.
    pub async fn count_matching(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<u64, Error> {
        let mut merged: Vec<(String, String)> = query.to_vec();
        merged.push(("per_page".to_owned(), "1".to_owned()));

        let envelope: CountEnvelope = self.get_json(path, &merged).await?;
        Ok(envelope.meta.total)
    }

    // ── Response handling ───────────────────────────────────────────

    /// Decode a response, translating 401 and error bodies along the way.
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Self::parse_error_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Best-effort decoding of an error body.
    ///
    /// A `{errors: {field: [messages]}}` shape becomes a validation error;
    /// a `{message}` shape becomes an API error; anything else (HTML error
    /// pages, truncated bodies) is swallowed into an API error carrying a
    /// snippet of the raw text. Never panics, never re-throws the parse
    /// failure.
    fn parse_error_body(status: u16, body: &str) -> Error {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                if let Some(errors) = parsed.errors {
                    return Error::Validation { status, errors };
                }
                Error::Api {
                    status,
                    message: parsed
                        .message
                        .unwrap_or_else(|| snippet(body)),
                }
            }
            Err(e) => {
                debug!("unparseable error body ({e}); keeping raw snippet");
                Error::Api {
                    status,
                    message: snippet(body),
                }
            }
        }
    }
}

/// Error body convention: validation rejections carry `errors`, everything
/// else carries `message`. Both optional -- the parse is defensive.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<HashMap<String, Vec<String>>>,
}

/// Minimal envelope for count queries: only `meta.total` matters.
#[derive(Debug, Deserialize)]
struct CountEnvelope {
    meta: CountMeta,
}

#[derive(Debug, Deserialize)]
struct CountMeta {
    total: u64,
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_owned();
    }
    let mut end = trimmed.len().min(MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed.get(..end).unwrap_or_default().to_owned()
}
