//! Contacts.

use std::future::Future;

use amocrm_client::{sort_by_id, AmoClient, Endpoint, Identified, RequestMethod};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::custom_fields::{find_value, CustomField, FieldValue};
use crate::error::Result;
use crate::leads::{LinkedEntity, Tag};
use crate::repository::{read_list, read_one, write_batch};

/// A contact. Absent fields are not serialized; `Some(0)` is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest_task_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields_values: Option<Vec<CustomField>>,
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<ContactEmbedded>,
}

impl Contact {
    /// First value of the custom field named `field_name`.
    pub fn custom_field(&self, field_name: &str) -> Option<&FieldValue> {
        find_value(self.custom_fields_values.as_deref()?, field_name)
    }
}

impl Identified for Contact {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

/// Entities linked to a contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactEmbedded {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<Vec<LinkedEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<LinkedEntity>>,
}

#[derive(Debug, Default, Deserialize)]
struct ContactList {
    #[serde(default)]
    contacts: Vec<Contact>,
}

/// Contact operations.
pub trait Contacts {
    /// Create contacts in one request.
    fn create(&self, contacts: &[Contact]) -> impl Future<Output = Result<Vec<Contact>>> + Send;

    /// Update contacts in one request; each contact must carry its id.
    fn update(&self, contacts: &[Contact]) -> impl Future<Output = Result<Vec<Contact>>> + Send;

    /// One page of contacts, sorted by ascending id.
    fn list(&self, page: u32) -> impl Future<Output = Result<Vec<Contact>>> + Send;

    /// A single contact, with optional linked data.
    fn get_one(&self, id: u64, with: &str) -> impl Future<Output = Result<Contact>> + Send;
}

/// [`Contacts`] backed by the REST API.
#[derive(Debug, Clone, Copy)]
pub struct ContactsRepository<'a> {
    client: &'a AmoClient,
}

impl<'a> ContactsRepository<'a> {
    pub fn new(client: &'a AmoClient) -> Self {
        Self { client }
    }
}

impl Contacts for ContactsRepository<'_> {
    #[instrument(skip(self, contacts), fields(count = contacts.len()))]
    async fn create(&self, contacts: &[Contact]) -> Result<Vec<Contact>> {
        let list: ContactList =
            write_batch(self.client, &Endpoint::CONTACTS, RequestMethod::Post, contacts).await?;
        Ok(list.contacts)
    }

    #[instrument(skip(self, contacts), fields(count = contacts.len()))]
    async fn update(&self, contacts: &[Contact]) -> Result<Vec<Contact>> {
        let list: ContactList =
            write_batch(self.client, &Endpoint::CONTACTS, RequestMethod::Patch, contacts).await?;
        Ok(list.contacts)
    }

    #[instrument(skip(self))]
    async fn list(&self, page: u32) -> Result<Vec<Contact>> {
        let page = page.to_string();
        let list: ContactList =
            read_list(self.client, &Endpoint::CONTACTS, &[("page", page.as_str())]).await?;

        let mut contacts = list.contacts;
        sort_by_id(&mut contacts);
        Ok(contacts)
    }

    #[instrument(skip(self))]
    async fn get_one(&self, id: u64, with: &str) -> Result<Contact> {
        read_one(self.client, &Endpoint::contact(id), with).await
    }
}
