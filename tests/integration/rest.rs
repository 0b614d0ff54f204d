use amocrm_api::rest::{
    Accounts, Call, Calls, Contact, Contacts, EventV2, EventsV2, FieldValue, Lead, Leads,
};
use amocrm_api::Token;
use chrono::{Duration, Utc};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{crm_for, mount_grant};

async fn authorized(server: &MockServer) -> amocrm_api::AmoCrm {
    let mut crm = crm_for(server);
    crm.set_token(Token::new("access", "refresh", Utc::now() + Duration::hours(1)))
        .unwrap();
    crm
}

#[tokio::test]
async fn authorize_then_page_leads() {
    let server = MockServer::start().await;
    mount_grant(&server, "authorization_code", "fresh", 1).await;
    Mock::given(method("GET"))
        .and(path("/api/v4/leads"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_page": 2,
            "_embedded": {"leads": [
                {"id": 30, "name": "C"},
                {"id": 10, "name": "A", "price": 0},
                {"id": 20, "name": "B"}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut crm = crm_for(&server);
    crm.load_token_or_authorize("code").await.unwrap();

    let leads = crm.leads().list(2).await.unwrap();
    let ids: Vec<_> = leads.iter().filter_map(|l| l.id).collect();
    assert_eq!(ids, [10, 20, 30]);
    assert_eq!(leads[0].price, Some(0));
}

#[tokio::test]
async fn lead_with_contacts_and_custom_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/leads/42"))
        .and(query_param("with", "contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 42,
            "name": "Deal",
            "custom_fields_values": [
                {"field_id": 1, "field_name": "Source", "values": [{"value": "site"}, {"value": "ads"}]},
                {"field_id": 2, "field_name": "Seats", "values": [{"value": 12}]}
            ],
            "_embedded": {"contacts": [{"id": 7, "is_main": true}]}
        })))
        .mount(&server)
        .await;

    let crm = authorized(&server).await;
    let lead = crm.leads().get_one(42, "contacts").await.unwrap();

    assert_eq!(
        lead.custom_field("Source").and_then(FieldValue::as_str),
        Some("site")
    );
    assert_eq!(lead.custom_field("Seats").and_then(FieldValue::as_i64), Some(12));
    assert!(lead.custom_field("Missing").is_none());

    let contacts = lead.embedded.and_then(|e| e.contacts).unwrap_or_default();
    assert_eq!(contacts[0].id, Some(7));
}

#[tokio::test]
async fn create_then_update_lead() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/leads"))
        .and(body_json(serde_json::json!([{"name": "New", "price": 100}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": {"leads": [{"id": 900}]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v4/leads"))
        .and(body_json(serde_json::json!([{"id": 900, "status_id": 142}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": {"leads": [{"id": 900, "updated_at": 1700000000}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let crm = authorized(&server).await;
    let created = crm
        .leads()
        .create(&[Lead {
            name: Some("New".into()),
            price: Some(100),
            ..Default::default()
        }])
        .await
        .unwrap();

    let updated = crm
        .leads()
        .update(&[Lead {
            id: created[0].id,
            status_id: Some(142),
            ..Default::default()
        }])
        .await
        .unwrap();
    assert_eq!(updated[0].updated_at, Some(1_700_000_000));
}

#[tokio::test]
async fn contact_call_and_event_round() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": {"contacts": [{"id": 5}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v4/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": {"calls": [{"id": 6, "entity_id": 5, "entity_type": "contact"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/events/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": {"items": [{"element_id": 5, "element_type": 1}]}
        })))
        .mount(&server)
        .await;

    let crm = authorized(&server).await;
    let contact = crm
        .contacts()
        .create(&[Contact {
            name: Some("Caller".into()),
            ..Default::default()
        }])
        .await
        .unwrap();
    assert_eq!(contact[0].id, Some(5));

    let calls = crm
        .calls()
        .create(&[Call {
            direction: Some("inbound".into()),
            phone: Some("+70000000000".into()),
            duration: Some(30),
            ..Default::default()
        }])
        .await
        .unwrap();
    assert_eq!(calls[0].entity_id, Some(5));

    let items = crm
        .events_v2()
        .add(&[EventV2::phone_call("+70000000000")])
        .await
        .unwrap();
    assert_eq!(items[0].element_id, Some(5));
}

#[tokio::test]
async fn account_not_found_and_transport_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/contacts/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let crm = authorized(&server).await;

    assert!(crm.accounts().current("").await.unwrap_err().is_not_found());

    let err = crm.contacts().get_one(1, "").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), Some(500));

    assert!(crm.contacts().list(1).await.unwrap_err().is_decode());
}

#[tokio::test]
async fn domain_binding_changes_base_url() {
    let mut crm = crm_for(&MockServer::start().await);
    assert!(crm.set_domain("-bad").is_err());
    assert!(crm.set_domain("a".repeat(64)).is_err());
    crm.set_domain("acme").unwrap();
    assert!(crm.host().base_url().starts_with("http://acme."));

    let url = crm.authorize_url("s", "post_message").unwrap();
    assert!(!url.as_str().contains("acme"));
}
