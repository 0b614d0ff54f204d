//! Events on the v2 API.
//!
//! Only the v2 `events` endpoint is wrapped; it is used to raise incoming
//! call notifications for users. Unlike the v4 resources, the request body is
//! an `{"add": [...]}` object and the answer lists created rows under
//! `_embedded.items`.

use std::future::Future;

use amocrm_client::{AmoClient, Endpoint, Envelope};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;

/// Event type of an incoming call notification.
pub const PHONE_CALL: &str = "phone_call";

/// An event to raise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventV2 {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Users to notify; everyone when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<u64>>,
}

impl EventV2 {
    /// Incoming call from `phone_number`.
    pub fn phone_call(phone_number: impl Into<String>) -> Self {
        Self {
            event_type: Some(PHONE_CALL.to_string()),
            phone_number: Some(phone_number.into()),
            users: None,
        }
    }
}

/// A row the server created for an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

#[derive(Serialize)]
struct AddEvents<'a> {
    add: &'a [EventV2],
}

#[derive(Debug, Default, Deserialize)]
struct EventItemList {
    #[serde(default)]
    items: Vec<EventItem>,
}

/// Event operations.
pub trait EventsV2 {
    /// Raise events in one request.
    fn add(&self, events: &[EventV2]) -> impl Future<Output = Result<Vec<EventItem>>> + Send;
}

/// [`EventsV2`] backed by the REST API.
#[derive(Debug, Clone, Copy)]
pub struct EventsV2Repository<'a> {
    client: &'a AmoClient,
}

impl<'a> EventsV2Repository<'a> {
    pub fn new(client: &'a AmoClient) -> Self {
        Self { client }
    }
}

impl EventsV2 for EventsV2Repository<'_> {
    #[instrument(skip(self, events), fields(count = events.len()))]
    async fn add(&self, events: &[EventV2]) -> Result<Vec<EventItem>> {
        let envelope: Option<Envelope<EventItemList>> = self
            .client
            .post_json(&Endpoint::EVENTS_V2, &AddEvents { add: events })
            .await?;
        Ok(envelope.unwrap_or_default().embedded.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amocrm_client::{AccountHost, ClientConfig};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AmoClient {
        let host = AccountHost::new(server.address().to_string())
            .unwrap()
            .with_scheme("http");
        let mut client = AmoClient::with_config(ClientConfig::builder().with_tracing(false).build())
            .unwrap()
            .with_host(host);
        client.set_access_token("token");
        client
    }

    #[tokio::test]
    async fn test_add_posts_to_v2_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/events/"))
            .and(body_json(serde_json::json!({
                "add": [{"type": "phone_call", "phone_number": "+70000000000", "users": [7]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_embedded": {"items": [{"element_id": 31, "element_type": 1, "uid": "abc"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let event = EventV2 {
            users: Some(vec![7]),
            ..EventV2::phone_call("+70000000000")
        };
        let items = EventsV2Repository::new(&client).add(&[event]).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].element_id, Some(31));
        assert_eq!(items[0].uid.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_empty_answer_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/events/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let items = EventsV2Repository::new(&client)
            .add(&[EventV2::phone_call("+7")])
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_phone_call_shape() {
        let value = serde_json::to_value(EventV2::phone_call("+7")).unwrap();
        assert_eq!(value, serde_json::json!({"type": "phone_call", "phone_number": "+7"}));
    }
}
