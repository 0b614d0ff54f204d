//! # amocrm-auth
//!
//! OAuth 2.0 for amoCRM integrations.
//!
//! ## Security
//!
//! - Tokens and the client secret are redacted in Debug output
//! - Tracing spans skip codes, tokens and secrets
//! - Token files are written with `0600` permissions on Unix
//!
//! ## Flow
//!
//! 1. Send the user to [`OAuthClient::authorize_url`] with a
//!    [`random_state`].
//! 2. Exchange the returned code with
//!    [`TokenManager::exchange_authorization_code`]; the token is persisted
//!    through the configured [`TokenStorage`].
//! 3. Install it with [`TokenManager::set_token`].
//! 4. Call [`TokenManager::refresh`] when [`TokenManager::needs_refresh`]
//!    says so. Nothing refreshes on its own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use amocrm_auth::{FileTokenStorage, OAuthClient, OAuthConfig, TokenManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), amocrm_auth::Error> {
//!     let oauth = OAuthClient::new(OAuthConfig::from_env()?)?;
//!     let mut manager = TokenManager::new(oauth)
//!         .with_storage(FileTokenStorage::new("mycompany")?);
//!
//!     let token = manager
//!         .exchange_authorization_code("def502...", "https://mycompany.amocrm.ru")
//!         .await?;
//!     manager.set_token(token)?;
//!     Ok(())
//! }
//! ```

mod error;
mod manager;
mod oauth;
mod storage;
mod token;

pub use error::{Error, ErrorKind, Result};
pub use manager::{TokenManager, INVALID_TOKEN};
pub use oauth::{
    random_state, AuthorizeMode, OAuthClient, OAuthConfig, TokenResponse, AUTHORIZE_PATH,
    TOKEN_PATH,
};
pub use storage::{default_token_dir, FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use token::{Token, REFRESH_LEEWAY_SECS};
