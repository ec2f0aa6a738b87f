// Session authentication
//
// Cookie-based login/logout against the platform's session endpoints.
// The flow is: fetch the CSRF cookie, mirror it into the CSRF header,
// then POST credentials. On success the session cookie lands in the
// client's jar and rides along on every subsequent request.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::AdminUser;

impl AdminClient {
    /// Prime the cookie jar with an `XSRF-TOKEN` cookie.
    ///
    /// `GET /sanctum/csrf-cookie` -- must run before [`login`](Self::login)
    /// or any state-mutating call on a fresh session.
    pub async fn fetch_csrf_cookie(&self) -> Result<(), Error> {
        let url = self
            .base_url()
            .join("sanctum/csrf-cookie")
            .map_err(Error::InvalidUrl)?;

        debug!("fetching CSRF cookie from {}", url);

        let resp = self
            .http()
            .get(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("CSRF cookie fetch failed (HTTP {status})"),
            });
        }

        if self.csrf_token().is_none() {
            return Err(Error::CsrfMissing);
        }
        Ok(())
    }

    /// Authenticate with email and password.
    ///
    /// `POST /login` with the CSRF header. On success the backend sets the
    /// session cookie; nothing is returned to the caller.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        self.fetch_csrf_cookie().await?;

        let url = self.base_url().join("login").map_err(Error::InvalidUrl)?;
        let token = self.csrf_token().ok_or(Error::CsrfMissing)?;

        debug!("logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .header("X-XSRF-TOKEN", token)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            // The login endpoint answers failures with `{message}`; fall
            // back to the status line when the body has nothing usable.
            let message = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str().map(str::to_owned)))
                .unwrap_or_else(|| format!("login failed (HTTP {status})"));
            return Err(Error::Authentication { message });
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.base_url().join("logout").map_err(Error::InvalidUrl)?;
        let token = self.csrf_token().ok_or(Error::CsrfMissing)?;

        debug!("logging out at {}", url);

        let _resp = self
            .http()
            .post(url)
            .header("X-XSRF-TOKEN", token)
            .send()
            .await
            .map_err(Error::Transport)?;

        debug!("logout complete");
        Ok(())
    }

    /// The currently authenticated admin, or [`Error::SessionExpired`]
    /// when the session cookie is gone.
    ///
    /// `GET /api/user`
    pub async fn current_user(&self) -> Result<AdminUser, Error> {
        self.get_json("api/user", &[]).await
    }
}
