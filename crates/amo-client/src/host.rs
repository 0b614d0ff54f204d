//! Account host binding.
//!
//! amoCRM serves every account from its own subdomain of the API host
//! (`https://{domain}.{api_host}`). Until the client is bound to an account
//! the domain is empty and URLs use the bare API host.

use crate::error::{Error, ErrorKind, Result};

/// Default amoCRM API host.
pub const DEFAULT_API_HOST: &str = "amocrm.ru";

const MAX_LABEL_LEN: usize = 63;

/// API host plus the optional account subdomain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountHost {
    scheme: String,
    api_host: String,
    domain: String,
}

impl Default for AccountHost {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            domain: String::new(),
        }
    }
}

impl AccountHost {
    /// Host binding for the given API host, with no account domain.
    pub fn new(api_host: impl Into<String>) -> Result<Self> {
        let mut host = Self::default();
        host.set_api_host(api_host)?;
        Ok(host)
    }

    /// Use a different URL scheme (`http` is only useful against a local
    /// mock server).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// The URL scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The API host, e.g. `amocrm.ru`.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// The account subdomain; empty when not yet bound.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Replace the API host.
    ///
    /// The host may carry a port (`127.0.0.1:8080`) but no scheme, path or
    /// whitespace.
    pub fn set_api_host(&mut self, api_host: impl Into<String>) -> Result<()> {
        let api_host = api_host.into();
        validate_api_host(&api_host)?;
        self.api_host = api_host;
        Ok(())
    }

    /// Bind to an account subdomain. An empty string unbinds.
    pub fn set_domain(&mut self, domain: impl Into<String>) -> Result<()> {
        let domain = domain.into();
        if !domain.is_empty() {
            validate_domain(&domain)?;
        }
        self.domain = domain;
        Ok(())
    }

    /// Base URL of account-scoped API calls: `{scheme}://{domain}.{api_host}`,
    /// or the bare `{scheme}://{api_host}` when no domain is bound.
    pub fn base_url(&self) -> String {
        if self.domain.is_empty() {
            format!("{}://{}", self.scheme, self.api_host)
        } else {
            format!("{}://{}.{}", self.scheme, self.domain, self.api_host)
        }
    }

    /// Base URL that never includes the account domain (used for the
    /// authorize page).
    pub fn bare_url(&self) -> String {
        format!("{}://{}", self.scheme, self.api_host)
    }
}

fn validation(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Validation(message.into()))
}

/// A domain is a single DNS label.
fn validate_domain(domain: &str) -> Result<()> {
    if domain.len() > MAX_LABEL_LEN {
        return Err(validation(format!(
            "domain longer than {MAX_LABEL_LEN} characters"
        )));
    }
    if domain.starts_with('-') || domain.ends_with('-') {
        return Err(validation("domain must not start or end with '-'"));
    }
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(validation(format!("invalid domain: {domain:?}")));
    }
    Ok(())
}

fn validate_api_host(api_host: &str) -> Result<()> {
    if api_host.is_empty() {
        return Err(validation("empty api host"));
    }
    if api_host.contains("://") || api_host.contains('/') {
        return Err(validation(format!(
            "api host must not carry a scheme or path: {api_host:?}"
        )));
    }

    let parsed = url::Url::parse(&format!("https://{api_host}")).map_err(|e| {
        Error::with_source(
            ErrorKind::Validation(format!("invalid api host: {api_host:?}")),
            e,
        )
    })?;
    if parsed.host_str().is_none() {
        return Err(validation(format!("invalid api host: {api_host:?}")));
    }
    Ok(())
}
