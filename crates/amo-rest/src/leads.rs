//! Leads (deals).

use std::future::Future;

use amocrm_client::{sort_by_id, AmoClient, Endpoint, Identified, RequestMethod};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::custom_fields::{find_value, CustomField, FieldValue};
use crate::error::Result;
use crate::repository::{read_list, read_one, write_batch};

/// A lead. Absent fields are not serialized; `Some(0)` is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<u64>,
    /// `0` marks the lead as created by a robot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<u64>,
    /// Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    /// Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_reason_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields_values: Option<Vec<CustomField>>,
    /// Linked entities. Only tags can be written.
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<LeadEmbedded>,
}

impl Lead {
    /// First value of the custom field named `field_name`.
    pub fn custom_field(&self, field_name: &str) -> Option<&FieldValue> {
        find_value(self.custom_fields_values.as_deref()?, field_name)
    }
}

impl Identified for Lead {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

/// Entities linked to a lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadEmbedded {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<LinkedContact>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<Vec<LinkedEntity>>,
}

/// A tag, addressed by id or by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A contact linked to a lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_main: Option<bool>,
}

/// Any other linked entity, by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LeadList {
    #[serde(default)]
    leads: Vec<Lead>,
}

/// Lead operations.
pub trait Leads {
    /// Create leads in one request. Returns what the server echoed back.
    fn create(&self, leads: &[Lead]) -> impl Future<Output = Result<Vec<Lead>>> + Send;

    /// Update leads in one request; each lead must carry its id.
    fn update(&self, leads: &[Lead]) -> impl Future<Output = Result<Vec<Lead>>> + Send;

    /// One page of leads, sorted by ascending id. An empty page is an empty
    /// list.
    fn list(&self, page: u32) -> impl Future<Output = Result<Vec<Lead>>> + Send;

    /// A single lead. `with` asks for linked data (e.g. `"contacts"`);
    /// pass `""` for none.
    fn get_one(&self, id: u64, with: &str) -> impl Future<Output = Result<Lead>> + Send;
}

/// [`Leads`] backed by the REST API.
#[derive(Debug, Clone, Copy)]
pub struct LeadsRepository<'a> {
    client: &'a AmoClient,
}

impl<'a> LeadsRepository<'a> {
    pub fn new(client: &'a AmoClient) -> Self {
        Self { client }
    }
}

impl Leads for LeadsRepository<'_> {
    #[instrument(skip(self, leads), fields(count = leads.len()))]
    async fn create(&self, leads: &[Lead]) -> Result<Vec<Lead>> {
        let list: LeadList =
            write_batch(self.client, &Endpoint::LEADS, RequestMethod::Post, leads).await?;
        Ok(list.leads)
    }

    #[instrument(skip(self, leads), fields(count = leads.len()))]
    async fn update(&self, leads: &[Lead]) -> Result<Vec<Lead>> {
        let list: LeadList =
            write_batch(self.client, &Endpoint::LEADS, RequestMethod::Patch, leads).await?;
        Ok(list.leads)
    }

    #[instrument(skip(self))]
    async fn list(&self, page: u32) -> Result<Vec<Lead>> {
        let page = page.to_string();
        let list: LeadList = read_list(self.client, &Endpoint::LEADS, &[("page", page.as_str())]).await?;

        let mut leads = list.leads;
        sort_by_id(&mut leads);
        Ok(leads)
    }

    #[instrument(skip(self))]
    async fn get_one(&self, id: u64, with: &str) -> Result<Lead> {
        read_one(self.client, &Endpoint::lead(id), with).await
    }
}
