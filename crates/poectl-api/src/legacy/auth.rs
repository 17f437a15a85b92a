// Legacy API authentication
//
// Cookie-based session login/logout and controller platform detection.
// The login endpoint sets a session cookie in the client's jar;
// subsequent requests use that cookie automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::transport::TransportConfig;

impl LegacyClient {
    /// Authenticate with the controller using username/password.
    ///
    /// On success the session cookie is stored in the client's cookie jar
    /// and used for all subsequent requests. The login endpoint differs
    /// by platform:
    /// - UniFi OS: `POST /api/auth/login`
    /// - Standalone: `POST /api/login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self
            .base_url()
            .join(self.platform().login_path())
            .map_err(Error::InvalidUrl)?;

        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
            "remember": false,
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        // UniFi OS requires the CSRF token on every mutating request
        // through the proxy.
        if let Some(token) = resp
            .headers()
            .get("X-CSRF-Token")
            .or_else(|| resp.headers().get("x-csrf-token"))
            .and_then(|v| v.to_str().ok())
        {
            self.set_csrf_token(token.to_owned());
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// - UniFi OS: `POST /api/auth/logout`
    /// - Standalone: `POST /api/logout`
    ///
    /// A 401 means the session was already gone and comes back as
    /// `Error::Authentication`.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self
            .base_url()
            .join(self.platform().logout_path())
            .map_err(Error::InvalidUrl)?;

        debug!("logging out at {}", url);

        let resp = self
            .http()
            .post(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        match resp.status() {
            reqwest::StatusCode::UNAUTHORIZED => Err(Error::Authentication {
                message: "session already expired".into(),
            }),
            status if !status.is_success() => Err(Error::LegacyApi {
                message: format!("logout failed (HTTP {status})"),
                status: Some(status.as_u16()),
            }),
            _ => {
                debug!("logout complete");
                Ok(())
            }
        }
    }

    /// Auto-detect the controller platform by probing login endpoints.
    ///
    /// Tries the UniFi OS endpoint first (`/api/auth/login`). Any response
    /// other than 404 means UniFi OS. Otherwise probes the standalone
    /// `/api/login` endpoint; a transport failure there is returned as-is.
    pub async fn detect_platform(
        base_url: &Url,
        transport: &TransportConfig,
    ) -> Result<ControllerPlatform, Error> {
        let http = transport.probe_client()?;

        let unifi_os_url = base_url
            .join(ControllerPlatform::UnifiOs.login_path())
            .map_err(Error::InvalidUrl)?;

        debug!("probing UniFi OS at {}", unifi_os_url);

        if let Ok(resp) = http.get(unifi_os_url).send().await {
            if resp.status() != reqwest::StatusCode::NOT_FOUND {
                debug!("detected UniFi OS platform");
                return Ok(ControllerPlatform::UnifiOs);
            }
        }

        let standalone_url = base_url
            .join(ControllerPlatform::ClassicController.login_path())
            .map_err(Error::InvalidUrl)?;

        debug!("probing standalone at {}", standalone_url);

        match http.get(standalone_url).send().await {
            Ok(_) => {
                debug!("detected standalone (classic) controller");
                Ok(ControllerPlatform::ClassicController)
            }
            Err(e) => Err(Error::Transport(e)),
        }
    }
}
