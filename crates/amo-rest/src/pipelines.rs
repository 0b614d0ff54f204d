//! Lead pipelines and their statuses.

use std::future::Future;

use amocrm_client::{AmoClient, Endpoint, Identified};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::repository::read_list;

/// A sales pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    /// Main pipeline of the account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_main: Option<bool>,
    /// Incoming leads are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unsorted_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<PipelineEmbedded>,
}

impl Pipeline {
    /// Statuses of the pipeline, empty when the answer had none.
    pub fn statuses(&self) -> &[PipelineStatus] {
        self.embedded
            .as_ref()
            .and_then(|e| e.statuses.as_deref())
            .unwrap_or_default()
    }
}

impl Identified for Pipeline {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineEmbedded {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<PipelineStatus>>,
}

/// A stage of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_editable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub status_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineList {
    #[serde(default)]
    pipelines: Vec<Pipeline>,
}

/// Pipeline operations.
pub trait Pipelines {
    /// Every pipeline of the account, in server order.
    fn list(&self) -> impl Future<Output = Result<Vec<Pipeline>>> + Send;
}

/// [`Pipelines`] backed by the REST API.
#[derive(Debug, Clone, Copy)]
pub struct PipelinesRepository<'a> {
    client: &'a AmoClient,
}

impl<'a> PipelinesRepository<'a> {
    pub fn new(client: &'a AmoClient) -> Self {
        Self { client }
    }
}

impl Pipelines for PipelinesRepository<'_> {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Pipeline>> {
        let list: PipelineList = read_list(self.client, &Endpoint::PIPELINES, &[]).await?;
        Ok(list.pipelines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amocrm_client::{AccountHost, ClientConfig};
    use wiremock::matchers::{method, path};
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
    async fn test_list_with_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/leads/pipelines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_total_items": 1,
                "_embedded": {"pipelines": [{
                    "id": 3,
                    "name": "Sales",
                    "sort": 1,
                    "is_main": true,
                    "_embedded": {"statuses": [
                        {"id": 142, "name": "Won", "type": 0, "color": "#CCFF66"},
                        {"id": 143, "name": "Lost", "type": 0}
                    ]}
                }]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let pipelines = PipelinesRepository::new(&client).list().await.unwrap();

        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].sort, Some(1));
        assert_eq!(pipelines[0].is_main, Some(true));
        let statuses = pipelines[0].statuses();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].status_type, Some(0));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/leads/pipelines"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(PipelinesRepository::new(&client).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/leads/pipelines"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = PipelinesRepository::new(&client).list().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_statuses_default_empty() {
        assert!(Pipeline::default().statuses().is_empty());
    }
}
