//! Call log entries.

use std::future::Future;

use amocrm_client::{AmoClient, Endpoint, Identified, RequestMethod};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::repository::write_batch;

/// A call attached to a contact, company or lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// `inbound` or `outbound`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Caller-side unique id of the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniq: Option<String>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Link to the recording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Echoed back unchanged; used to match answers to requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
}

impl Identified for Call {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

#[derive(Debug, Default, Deserialize)]
struct CallList {
    #[serde(default)]
    calls: Vec<Call>,
}

/// Call operations.
pub trait Calls {
    /// Log calls in one request.
    fn create(&self, calls: &[Call]) -> impl Future<Output = Result<Vec<Call>>> + Send;
}

/// [`Calls`] backed by the REST API.
#[derive(Debug, Clone, Copy)]
pub struct CallsRepository<'a> {
    client: &'a AmoClient,
}

impl<'a> CallsRepository<'a> {
    pub fn new(client: &'a AmoClient) -> Self {
        Self { client }
    }
}

impl Calls for CallsRepository<'_> {
    #[instrument(skip(self, calls), fields(count = calls.len()))]
    async fn create(&self, calls: &[Call]) -> Result<Vec<Call>> {
        let list: CallList =
            write_batch(self.client, &Endpoint::CALLS, RequestMethod::Post, calls).await?;
        Ok(list.calls)
    }
}
