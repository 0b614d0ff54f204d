//! Authenticated request executor for the amoCRM API.
//!
//! `AmoClient` combines the account host binding, the current access token
//! and the HTTP transport. Repositories resolve an [`Endpoint`], get a
//! request from [`AmoClient::request`], and decode the buffered response.
//!
//! ## Security
//!
//! - The access token is redacted in Debug output
//! - Request bodies are skipped in tracing spans

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::client::AmoHttpClient;
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{Error, ErrorKind, Result};
use crate::host::AccountHost;
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::Response;

/// Message carried by the authentication error raised when no token is
/// installed.
pub const INVALID_TOKEN: &str = "invalid token";

/// Request executor shared by every amoCRM repository.
///
/// # Example
///
/// ```rust,ignore
/// use amocrm_client::{AmoClient, Endpoint};
///
/// let mut client = AmoClient::new()?;
/// client.set_domain("mycompany")?;
/// client.set_access_token("...");
///
/// let leads: Option<serde_json::Value> = client
///     .get_json(&Endpoint::LEADS, &[("page", "1")])
///     .await?;
/// ```
#[derive(Clone)]
pub struct AmoClient {
    http: AmoHttpClient,
    host: AccountHost,
    access_token: Option<String>,
}

impl std::fmt::Debug for AmoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmoClient")
            .field("base_url", &self.host.base_url())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl AmoClient {
    /// Create a client for the default API host with default transport
    /// settings and no token.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom transport configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: AmoHttpClient::new(config)?,
            host: AccountHost::default(),
            access_token: None,
        })
    }

    /// Replace the host binding.
    pub fn with_host(mut self, host: AccountHost) -> Self {
        self.host = host;
        self
    }

    /// The underlying HTTP transport (unauthenticated).
    pub fn http(&self) -> &AmoHttpClient {
        &self.http
    }

    /// The current host binding.
    pub fn host(&self) -> &AccountHost {
        &self.host
    }

    /// Change the API host. Invalid input leaves the old host in place.
    pub fn set_api_host(&mut self, api_host: impl Into<String>) -> Result<()> {
        self.host.set_api_host(api_host)
    }

    /// Bind to an account subdomain. Invalid input leaves the old domain in
    /// place; an empty string unbinds.
    pub fn set_domain(&mut self, domain: impl Into<String>) -> Result<()> {
        self.host.set_domain(domain)
    }

    /// Install the bearer token used for every subsequent request.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Drop the installed token.
    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    /// The installed access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Full URL of an endpoint under the current host binding.
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.host.base_url(), endpoint.path())
    }

    /// Authenticated request builder for an endpoint.
    ///
    /// Fails with an authentication error, before any I/O, when no token is
    /// installed.
    pub fn request(&self, endpoint: &Endpoint, method: RequestMethod) -> Result<RequestBuilder> {
        let token = self
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::new(ErrorKind::Authentication(INVALID_TOKEN.to_string())))?;

        Ok(RequestBuilder::new(method, self.url_for(endpoint)).bearer_auth(token))
    }

    /// Send a request, failing on non-2xx.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    /// GET an endpoint and decode the JSON body. A zero-byte body yields
    /// `Ok(None)`.
    #[instrument(skip(self, query), fields(endpoint = %endpoint))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let request = self
            .request(endpoint, RequestMethod::Get)?
            .query_pairs(query.iter().copied());
        let response = self.execute(request).await?;
        response.json()
    }

    /// Send a JSON body to an endpoint and decode the JSON answer. A
    /// zero-byte body yields `Ok(None)`.
    #[instrument(skip(self, body), fields(endpoint = %endpoint, method = ?method))]
    pub async fn send_json<T, B>(
        &self,
        endpoint: &Endpoint,
        method: RequestMethod,
        body: &B,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(endpoint, method)?.json(body)?;
        let response = self.execute(request).await?;
        response.json()
    }

    /// POST a JSON body.
    pub async fn post_json<T, B>(&self, endpoint: &Endpoint, body: &B) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(endpoint, RequestMethod::Post, body).await
    }

    /// PATCH a JSON body.
    pub async fn patch_json<T, B>(&self, endpoint: &Endpoint, body: &B) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(endpoint, RequestMethod::Patch, body).await
    }

    /// DELETE an endpoint, discarding any body.
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn delete(&self, endpoint: &Endpoint) -> Result<()> {
        let request = self.request(endpoint, RequestMethod::Delete)?;
        self.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AmoClient {
        let host = AccountHost::new(server.address().to_string())
            .unwrap()
            .with_scheme("http");
        let mut client = AmoClient::with_config(ClientConfig::builder().with_tracing(false).build())
            .unwrap()
            .with_host(host);
        client.set_access_token("test-token");
        client
    }

    #[test]
    fn test_url_for_uses_domain() {
        let mut client = AmoClient::new().unwrap();
        assert_eq!(
            client.url_for(&Endpoint::LEADS),
            "https://amocrm.ru/api/v4/leads"
        );

        client.set_api_host("amocrm.ru").unwrap();
        client.set_domain("mycompany").unwrap();
        assert_eq!(
            client.url_for(&Endpoint::lead(42)),
            "https://mycompany.amocrm.ru/api/v4/leads/42"
        );
        assert_eq!(
            client.url_for(&Endpoint::EVENTS_V2),
            "https://mycompany.amocrm.ru/api/v2/events/"
        );
    }

    #[test]
    fn test_invalid_domain_keeps_previous_binding() {
        let mut client = AmoClient::new().unwrap();
        client.set_domain("good").unwrap();
        assert!(client.set_domain("bad.domain").is_err());
        assert_eq!(client.host().domain(), "good");
    }

    #[test]
    fn test_request_without_token_fails_before_io() {
        let client = AmoClient::new().unwrap();
        let err = client
            .request(&Endpoint::LEADS, RequestMethod::Get)
            .unwrap_err();
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), "Authentication error: invalid token");
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let mut client = AmoClient::new().unwrap();
        client.set_access_token("");
        assert!(client
            .request(&Endpoint::LEADS, RequestMethod::Get)
            .is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut client = AmoClient::new().unwrap();
        client.set_access_token("super-secret-token");
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }

    #[tokio::test]
    async fn test_get_json_sends_bearer_and_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/leads"))
            .and(query_param("page", "2"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_embedded": {"leads": [{"id": 1}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let value: Option<serde_json::Value> = client
            .get_json(&Endpoint::LEADS, &[("page", "2")])
            .await
            .unwrap();

        assert_eq!(value.unwrap()["_embedded"]["leads"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_empty_body_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/leads/pipelines"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let value: Option<serde_json::Value> =
            client.get_json(&Endpoint::PIPELINES, &[]).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": "))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_json::<serde_json::Value>(&Endpoint::ACCOUNTS, &[])
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_not_found_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/leads/9"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_json::<serde_json::Value>(&Endpoint::lead(9), &[])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("not here"));
    }

    #[tokio::test]
    async fn test_patch_sends_bare_array() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v4/leads"))
            .and(body_json(serde_json::json!([{"id": 3, "name": "Renamed"}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_embedded": {"leads": [{"id": 3}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body = vec![serde_json::json!({"id": 3, "name": "Renamed"})];
        let value: Option<serde_json::Value> =
            client.patch_json(&Endpoint::LEADS, &body).await.unwrap();
        assert!(value.is_some());
    }
}
