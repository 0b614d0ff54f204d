//! Token lifecycle.
//!
//! The manager holds the single current [`Token`] and performs the grant
//! exchanges. Nothing here refreshes implicitly: [`TokenManager::refresh`]
//! runs only when the caller asks for it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::oauth::{OAuthClient, TokenResponse};
use crate::storage::TokenStorage;
use crate::token::Token;

/// Message of the error raised when no usable token is available.
pub const INVALID_TOKEN: &str = "invalid token";

/// Owner of the current token state.
pub struct TokenManager {
    oauth: OAuthClient,
    storage: Option<Arc<dyn TokenStorage>>,
    token: Option<Token>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("oauth", &self.oauth)
            .field("has_storage", &self.storage.is_some())
            .field("token", &self.token)
            .finish()
    }
}

impl TokenManager {
    /// Manager without persistence.
    pub fn new(oauth: OAuthClient) -> Self {
        Self {
            oauth,
            storage: None,
            token: None,
        }
    }

    /// Persist exchanged tokens through `storage`.
    pub fn with_storage(mut self, storage: impl TokenStorage + 'static) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// The OAuth client.
    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    /// The installed token, if any.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Exchange an authorization code for a token and persist it.
    ///
    /// The token is returned, not installed; see [`TokenManager::set_token`].
    #[instrument(skip(self, code))]
    pub async fn exchange_authorization_code(&self, code: &str, base_url: &str) -> Result<Token> {
        let response = self.oauth.exchange_code(code, base_url).await?;
        let token = self.accept(response)?;
        info!("Authorization code exchanged");
        Ok(token)
    }

    /// Install a token directly.
    ///
    /// Rejects a token missing its access or refresh secret; the previous
    /// token stays installed in that case.
    pub fn set_token(&mut self, token: Token) -> Result<()> {
        token.validate()?;
        self.token = Some(token);
        Ok(())
    }

    /// Load the persisted token. `None` when nothing was persisted or when no
    /// storage is configured.
    pub fn load_token(&self) -> Result<Option<Token>> {
        match &self.storage {
            Some(storage) => storage.load(),
            None => {
                debug!("No token storage configured");
                Ok(None)
            }
        }
    }

    /// The installed token, or an "invalid token" error.
    pub fn ensure_valid(&self) -> Result<&Token> {
        self.token
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::TokenInvalid(INVALID_TOKEN.to_string())))
    }

    /// Exchange the installed refresh token for a new pair, then persist and
    /// install it.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self, base_url: &str) -> Result<Token> {
        let refresh_token = self.ensure_valid()?.refresh_token.clone();
        let response = self.oauth.refresh_token(&refresh_token, base_url).await?;
        let token = self.accept(response)?;
        self.token = Some(token.clone());
        info!("Token refreshed");
        Ok(token)
    }

    /// Advisory: true when the installed token expires within a minute of
    /// `now`. False when no token is installed.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.token.as_ref().is_some_and(|t| t.needs_refresh(now))
    }

    /// Drop the installed token. Persisted state is untouched.
    pub fn clear_token(&mut self) -> Option<Token> {
        self.token.take()
    }

    /// Drop the installed token and delete the persisted one.
    pub fn forget_token(&mut self) -> Result<()> {
        self.token = None;
        if let Some(storage) = &self.storage {
            storage.delete()?;
        }
        Ok(())
    }

    fn accept(&self, response: TokenResponse) -> Result<Token> {
        let token = Token::from_response(response, Utc::now());
        token.validate()?;
        if let Some(storage) = &self.storage {
            storage.save(&token)?;
        }
        Ok(token)
    }
}
