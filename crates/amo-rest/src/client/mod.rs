//! amoCRM API client.
//!
//! [`AmoCrm`] owns the request executor and the token state. Authorization
//! lives in the `auth` submodule; resource operations are reached through
//! the repository accessors below.

use amocrm_auth::{OAuthClient, OAuthConfig, Token, TokenManager, TokenStorage};
use amocrm_client::{AccountHost, AmoClient, ClientConfig};

use crate::accounts::AccountsRepository;
use crate::calls::CallsRepository;
use crate::contacts::ContactsRepository;
use crate::error::Result;
use crate::events::EventsV2Repository;
use crate::leads::LeadsRepository;
use crate::pipelines::PipelinesRepository;

mod auth;

/// amoCRM API client.
///
/// Requests need an installed token; install one through one of the
/// authorization entry points ([`AmoCrm::load_token_or_authorize`],
/// [`AmoCrm::new_token_and_authorize`], [`AmoCrm::load_token_and_authorize`])
/// or [`AmoCrm::set_token`]. Tokens are never refreshed behind the caller's
/// back; see [`AmoCrm::needs_refresh`] and [`AmoCrm::refresh_token`].
///
/// # Example
///
/// ```rust,ignore
/// use amocrm_rest::{AmoCrm, FileTokenStorage, Leads, OAuthConfig};
///
/// let mut crm = AmoCrm::new(OAuthConfig::from_env()?)?
///     .with_storage(FileTokenStorage::new("mycompany")?);
/// crm.set_domain("mycompany")?;
/// crm.load_token_or_authorize(&code).await?;
///
/// let leads = crm.leads().list(1).await?;
/// ```
#[derive(Debug)]
pub struct AmoCrm {
    client: AmoClient,
    tokens: TokenManager,
}

impl AmoCrm {
    /// Client for the default API host with default transport settings.
    pub fn new(oauth: OAuthConfig) -> Result<Self> {
        Self::with_config(oauth, ClientConfig::default())
    }

    /// Client with custom transport configuration. API calls and grant
    /// exchanges share one connection pool.
    pub fn with_config(oauth: OAuthConfig, config: ClientConfig) -> Result<Self> {
        let client = AmoClient::with_config(config)?;
        let oauth = OAuthClient::with_http(oauth, client.http().clone());
        Ok(Self {
            client,
            tokens: TokenManager::new(oauth),
        })
    }

    /// Persist exchanged tokens through `storage`.
    pub fn with_storage(mut self, storage: impl TokenStorage + 'static) -> Self {
        self.tokens = self.tokens.with_storage(storage);
        self
    }

    /// Replace the host binding.
    pub fn with_host(mut self, host: AccountHost) -> Self {
        self.client = self.client.with_host(host);
        self
    }

    /// The underlying request executor.
    pub fn inner(&self) -> &AmoClient {
        &self.client
    }

    /// The token state.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// The installed token, if any.
    pub fn token(&self) -> Option<&Token> {
        self.tokens.token()
    }

    /// The current host binding.
    pub fn host(&self) -> &AccountHost {
        self.client.host()
    }

    /// Change the API host. Invalid input leaves the old host in place.
    pub fn set_api_host(&mut self, api_host: impl Into<String>) -> Result<()> {
        Ok(self.client.set_api_host(api_host)?)
    }

    /// Bind to an account subdomain. Invalid input leaves the old domain in
    /// place; an empty string unbinds.
    pub fn set_domain(&mut self, domain: impl Into<String>) -> Result<()> {
        Ok(self.client.set_domain(domain)?)
    }

    pub fn accounts(&self) -> AccountsRepository<'_> {
        AccountsRepository::new(&self.client)
    }

    pub fn leads(&self) -> LeadsRepository<'_> {
        LeadsRepository::new(&self.client)
    }

    pub fn pipelines(&self) -> PipelinesRepository<'_> {
        PipelinesRepository::new(&self.client)
    }

    pub fn contacts(&self) -> ContactsRepository<'_> {
        ContactsRepository::new(&self.client)
    }

    pub fn calls(&self) -> CallsRepository<'_> {
        CallsRepository::new(&self.client)
    }

    pub fn events_v2(&self) -> EventsV2Repository<'_> {
        EventsV2Repository::new(&self.client)
    }
}
