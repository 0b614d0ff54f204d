//! Authorization entry points.

use amocrm_auth::{Token, INVALID_TOKEN};
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use super::AmoCrm;
use crate::error::{Error, ErrorKind, Result};

impl AmoCrm {
    /// URL of the page where the user grants access to the integration.
    ///
    /// Always built on the bare API host, never the account subdomain.
    /// `mode` is `"post_message"` or `"popup"`.
    pub fn authorize_url(&self, state: &str, mode: &str) -> Result<url::Url> {
        let base_url = self.client.host().bare_url();
        Ok(self.tokens.oauth().authorize_url(&base_url, state, mode)?)
    }

    /// Exchange an authorization code for a token and persist it. The token
    /// is returned, not installed.
    #[instrument(skip(self, code))]
    pub async fn token_by_code(&self, code: &str) -> Result<Token> {
        let base_url = self.client.host().base_url();
        Ok(self
            .tokens
            .exchange_authorization_code(code, &base_url)
            .await?)
    }

    /// Install the persisted token; exchange `code` only when nothing was
    /// persisted.
    #[instrument(skip(self, code))]
    pub async fn load_token_or_authorize(&mut self, code: &str) -> Result<Token> {
        if let Some(token) = self.tokens.load_token()? {
            info!("Using persisted token");
            return self.install(token);
        }

        let token = self.token_by_code(code).await?;
        self.install(token)
    }

    /// Exchange `code` and install the result, ignoring any persisted token.
    #[instrument(skip(self, code))]
    pub async fn new_token_and_authorize(&mut self, code: &str) -> Result<Token> {
        let token = self.token_by_code(code).await?;
        self.install(token)
    }

    /// Install the persisted token. Fails with "invalid token" when nothing
    /// was persisted. Never touches the network.
    pub fn load_token_and_authorize(&mut self) -> Result<Token> {
        match self.tokens.load_token()? {
            Some(token) => self.install(token),
            None => Err(Error::new(ErrorKind::Auth(INVALID_TOKEN.to_string()))),
        }
    }

    /// Install a token directly. A token missing either secret is rejected
    /// and the previous one stays installed.
    pub fn set_token(&mut self, token: Token) -> Result<()> {
        self.install(token).map(|_| ())
    }

    /// Exchange the installed refresh token for a new pair, then persist
    /// and install it.
    #[instrument(skip(self))]
    pub async fn refresh_token(&mut self) -> Result<Token> {
        let base_url = self.client.host().base_url();
        let token = self.tokens.refresh(&base_url).await?;
        self.client.set_access_token(token.access_token.clone());
        Ok(token)
    }

    /// Advisory: true when the installed token expires within a minute of
    /// `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.tokens.needs_refresh(now)
    }

    /// Drop the installed token. Persisted state is untouched.
    pub fn clear_token(&mut self) -> Option<Token> {
        self.client.clear_access_token();
        self.tokens.clear_token()
    }

    /// Drop the installed token and delete the persisted one.
    pub fn forget_token(&mut self) -> Result<()> {
        self.client.clear_access_token();
        Ok(self.tokens.forget_token()?)
    }

    fn install(&mut self, token: Token) -> Result<Token> {
        self.tokens.set_token(token.clone())?;
        self.client.set_access_token(token.access_token.clone());
        Ok(token)
    }
}
