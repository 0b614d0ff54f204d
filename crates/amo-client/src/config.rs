//! Transport settings shared by API calls and token grants.

use std::time::Duration;

/// Whole-request deadline, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for the TCP + TLS handshake alone.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// amoCRM throttles an integration to a handful of requests per second, so a
/// small idle pool per account host is enough.
pub const DEFAULT_POOL_MAX_IDLE: usize = 4;

/// Settings of the pooled HTTP client behind [`crate::AmoHttpClient`].
///
/// No retry knobs: a request goes out once and its failure is returned as is.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// How long an idle keep-alive connection to the account host survives.
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    /// Sent on every request, grants included. Defaults to
    /// [`crate::USER_AGENT`].
    pub user_agent: String,
    /// Emit `debug`/`info` events for each request and answer. Bodies and
    /// bearer tokens are never logged either way.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE,
            user_agent: crate::USER_AGENT.to_string(),
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]; starts from the defaults.
///
/// ```rust,ignore
/// let config = ClientConfig::builder()
///     .with_timeout(Duration::from_secs(60))
///     .with_tracing(false)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Zero disables keep-alive reuse.
    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Replace the User-Agent, e.g. with the integration's own name.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// A connect deadline longer than the request deadline is cut down to it.
    pub fn build(mut self) -> ClientConfig {
        if self.config.connect_timeout > self.config.timeout {
            self.config.connect_timeout = self.config.timeout;
        }
        self.config
    }
}
