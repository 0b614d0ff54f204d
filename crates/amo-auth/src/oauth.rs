//! OAuth 2.0 authorization-code flow against amoCRM.
//!
//! - **Authorize URL** - the page that asks the user for permissions
//! - **Code exchange** - `authorization_code` grant
//! - **Refresh** - `refresh_token` grant, only ever called explicitly

use std::str::FromStr;

use amocrm_client::{AmoHttpClient, ClientConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{Error, ErrorKind, Result};

/// Path of the token endpoint under the account base URL.
pub const TOKEN_PATH: &str = "/oauth2/access_token";

/// Path of the authorize page under the bare API host.
pub const AUTHORIZE_PATH: &str = "/oauth";

/// OAuth 2.0 configuration of an amoCRM integration.
///
/// `client_secret` is redacted in Debug output.
#[derive(Clone)]
pub struct OAuthConfig {
    /// Integration id.
    pub client_id: String,
    client_secret: String,
    /// Redirect URL registered with the integration.
    pub redirect_url: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

impl OAuthConfig {
    /// Create a new OAuth config.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
        }
    }

    /// Load the config from environment variables.
    ///
    /// Required environment variables:
    /// - `AMOCRM_CLIENT_ID`
    /// - `AMOCRM_CLIENT_SECRET`
    /// - `AMOCRM_REDIRECT_URL`
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|e| Error::with_source(ErrorKind::EnvVar(name.to_string()), e))
        };

        Ok(Self::new(
            var("AMOCRM_CLIENT_ID")?,
            var("AMOCRM_CLIENT_SECRET")?,
            var("AMOCRM_REDIRECT_URL")?,
        ))
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

/// How the authorize page hands the code back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeMode {
    /// The page posts the result to the opener window.
    PostMessage,
    /// The page redirects inside a popup.
    Popup,
}

impl AuthorizeMode {
    /// Wire literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizeMode::PostMessage => "post_message",
            AuthorizeMode::Popup => "popup",
        }
    }
}

impl AsRef<str> for AuthorizeMode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for AuthorizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorizeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "post_message" => Ok(AuthorizeMode::PostMessage),
            "popup" => Ok(AuthorizeMode::Popup),
            other => Err(Error::new(ErrorKind::InvalidInput(format!(
                "unexpected mode: {other:?}"
            )))),
        }
    }
}

/// A fresh random `state` value: 32 lowercase hex characters.
pub fn random_state() -> String {
    let key: [u8; 16] = rand::random();
    hex::encode(key)
}

/// Grant answer from the token endpoint.
///
/// Both tokens are redacted in Debug output.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Error body of the token endpoint.
#[derive(Debug, Default, Deserialize)]
struct OAuthErrorResponse {
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl OAuthErrorResponse {
    fn description(self, raw: &str) -> String {
        self.hint
            .or(self.detail)
            .or(self.title)
            .unwrap_or_else(|| raw.trim().to_string())
    }
}

/// OAuth client for an amoCRM integration.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: AmoHttpClient,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OAuthClient {
    /// Create a new OAuth client with default transport settings.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        Ok(Self::with_http(
            config,
            AmoHttpClient::new(ClientConfig::default())?,
        ))
    }

    /// Create a new OAuth client sharing an existing transport.
    pub fn with_http(config: OAuthConfig, http: AmoHttpClient) -> Self {
        Self { config, http }
    }

    /// Get the OAuth config.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// URL of the page asking the user for permissions.
    ///
    /// `base_url` is the bare API host URL (no account domain). The query
    /// carries exactly `mode`, `state` and `client_id`. An empty state or an
    /// unknown mode fail before any I/O.
    pub fn authorize_url(&self, base_url: &str, state: &str, mode: &str) -> Result<url::Url> {
        if state.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput("empty state".to_string())));
        }
        let mode: AuthorizeMode = mode.parse()?;

        let mut url = url::Url::parse(&format!("{base_url}{AUTHORIZE_PATH}"))?;
        url.query_pairs_mut()
            .append_pair("mode", mode.as_str())
            .append_pair("state", state)
            .append_pair("client_id", &self.config.client_id);

        Ok(url)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// The code is not logged.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str, base_url: &str) -> Result<TokenResponse> {
        if code.is_empty() {
            return Err(Error::new(ErrorKind::InvalidGrant(
                "empty authorization code".to_string(),
            )));
        }

        self.grant(base_url, [("grant_type", "authorization_code"), ("code", code)])
            .await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The refresh token is not logged.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_token(&self, refresh_token: &str, base_url: &str) -> Result<TokenResponse> {
        if refresh_token.is_empty() {
            return Err(Error::new(ErrorKind::InvalidGrant(
                "empty refresh token".to_string(),
            )));
        }

        self.grant(
            base_url,
            [("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
        )
        .await
    }

    async fn grant(&self, base_url: &str, grant: [(&str, &str); 2]) -> Result<TokenResponse> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret()),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let request = self
            .http
            .post(format!("{base_url}{TOKEN_PATH}"))
            .form(grant.into_iter().chain(params));
        let response = self.http.execute_raw(request).await?;

        if !response.is_success() {
            let status = response.status();
            let raw = response.text();
            let description = response
                .json::<OAuthErrorResponse>()
                .ok()
                .flatten()
                .unwrap_or_default()
                .description(&raw);

            info!(status, "Token endpoint refused grant");

            let source =
                amocrm_client::Error::new(amocrm_client::ErrorKind::Http { status, body: raw });
            return Err(Error::with_source(
                ErrorKind::OAuth {
                    status,
                    description,
                },
                source,
            ));
        }

        response
            .json::<TokenResponse>()?
            .ok_or_else(|| Error::new(ErrorKind::Json("empty token response".to_string())))
    }
}
