use amocrm_api::auth::MemoryTokenStorage;
use amocrm_api::rest::{ErrorKind, Pipelines};
use amocrm_api::{FileTokenStorage, Token, TokenStorage};
use chrono::{Duration, Utc};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{crm_for, mount_grant, CLIENT_ID};

#[tokio::test]
async fn first_run_exchanges_then_restart_reuses_file() {
    let server = MockServer::start().await;
    mount_grant(&server, "authorization_code", "first", 1).await;
    let dir = tempfile::tempdir().unwrap();

    let mut crm = crm_for(&server).with_storage(FileTokenStorage::in_dir(dir.path(), "acme"));
    let token = crm.load_token_or_authorize("code-1").await.unwrap();
    assert_eq!(token.access_token, "first");

    // Second process: same storage, the code is never exchanged again.
    let mut restarted =
        crm_for(&server).with_storage(FileTokenStorage::in_dir(dir.path(), "acme"));
    let reused = restarted.load_token_or_authorize("code-2").await.unwrap();
    assert_eq!(reused, token);
    assert_eq!(restarted.inner().access_token(), Some("first"));
}

#[tokio::test]
async fn load_and_authorize_never_calls_network() {
    let server = MockServer::start().await;
    mount_grant(&server, "authorization_code", "unused", 0).await;
    let dir = tempfile::tempdir().unwrap();

    let mut crm = crm_for(&server).with_storage(FileTokenStorage::in_dir(dir.path(), "acme"));
    let err = crm.load_token_and_authorize().unwrap_err();
    assert!(err.is_auth());
    assert!(err.to_string().contains("invalid token"));

    let storage = FileTokenStorage::in_dir(dir.path(), "acme");
    storage
        .save(&Token::new("saved", "saved-refresh", Utc::now() + Duration::hours(1)))
        .unwrap();

    let mut crm = crm_for(&server).with_storage(storage);
    crm.load_token_and_authorize().unwrap();
    assert_eq!(crm.inner().access_token(), Some("saved"));
}

#[tokio::test]
async fn new_token_replaces_stored_one() {
    let server = MockServer::start().await;
    mount_grant(&server, "authorization_code", "replacement", 1).await;

    let storage = std::sync::Arc::new(MemoryTokenStorage::with_token(Token::new(
        "old",
        "old-refresh",
        Utc::now() + Duration::hours(1),
    )));
    let mut crm = crm_for(&server).with_storage(storage.clone());

    crm.new_token_and_authorize("code").await.unwrap();
    assert_eq!(crm.inner().access_token(), Some("replacement"));
    assert_eq!(storage.load().unwrap().unwrap().access_token, "replacement");
}

#[tokio::test]
async fn refused_code_surfaces_vendor_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "title": "Bad Request",
            "status": 400,
            "hint": "Authorization code has been revoked"
        })))
        .mount(&server)
        .await;

    let mut crm = crm_for(&server);
    let err = crm.new_token_and_authorize("revoked").await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Auth(_)));
    assert!(err.to_string().contains("Authorization code has been revoked"));
    assert!(crm.token().is_none());
}

#[tokio::test]
async fn explicit_refresh_rotates_bearer() {
    let server = MockServer::start().await;
    mount_grant(&server, "refresh_token", "rotated", 1).await;
    Mock::given(method("GET"))
        .and(path("/api/v4/leads/pipelines"))
        .and(header("authorization", "Bearer rotated"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut crm = crm_for(&server);
    crm.set_token(Token::new("stale", "stale-refresh", Utc::now() + Duration::seconds(10)))
        .unwrap();
    assert!(crm.needs_refresh(Utc::now()));

    crm.refresh_token().await.unwrap();
    assert!(!crm.needs_refresh(Utc::now()));

    assert!(crm.pipelines().list().await.unwrap().is_empty());
}

#[test]
fn authorize_url_has_exactly_three_params() {
    let server_less = amocrm_api::AmoCrm::new(amocrm_api::OAuthConfig::new(
        CLIENT_ID,
        "secret",
        "https://example.com/cb",
    ))
    .unwrap();

    let url = server_less.authorize_url("state-1", "popup").unwrap();
    assert_eq!(url.scheme(), "https");
    assert_eq!(url.host_str(), Some("amocrm.ru"));
    assert_eq!(url.path(), "/oauth");
    assert_eq!(
        url.query(),
        Some(format!("mode=popup&state=state-1&client_id={CLIENT_ID}").as_str())
    );

    assert!(server_less.authorize_url("", "popup").is_err());
    assert!(server_less.authorize_url("s", "redirect").is_err());
}
