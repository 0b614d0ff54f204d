use amocrm_api::{AccountHost, AmoCrm, ClientConfig, OAuthConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "integration-id";

/// A client bound to the mock server over plain HTTP.
pub fn crm_for(server: &MockServer) -> AmoCrm {
    let host = AccountHost::new(server.address().to_string())
        .expect("valid mock host")
        .with_scheme("http");
    AmoCrm::with_config(
        OAuthConfig::new(CLIENT_ID, "integration-secret", "https://example.com/cb"),
        ClientConfig::builder().with_tracing(false).build(),
    )
    .expect("client")
    .with_host(host)
}

/// Answer `grant_type` exchanges with a fresh pair, `times` times.
pub async fn mount_grant(server: &MockServer, grant_type: &str, access: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/access_token"))
        .and(body_string_contains(format!("grant_type={grant_type}")))
        .and(body_string_contains(format!("client_id={CLIENT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 86400,
            "access_token": access,
            "refresh_token": format!("{access}-refresh")
        })))
        .expect(times)
        .mount(server)
        .await;
}
