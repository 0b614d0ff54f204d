//! The account the token belongs to.

use std::future::Future;

use amocrm_client::{AmoClient, Endpoint, Identified};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::repository::read_one;

/// Account settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<u64>,
    /// User the token was issued for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unsorted_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_loss_reason_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_helpbot_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_technical_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name_display_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amojo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Whatever was asked for with `with`, kept undecoded.
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<serde_json::Value>,
}

impl Identified for Account {
    fn id(&self) -> Option<u64> {
        self.id
    }
}

/// Account operations.
pub trait Accounts {
    /// The current account. `with` takes a comma-separated list such as
    /// `"amojo_id,version"`; pass `""` for none.
    fn current(&self, with: &str) -> impl Future<Output = Result<Account>> + Send;
}

/// [`Accounts`] backed by the REST API.
#[derive(Debug, Clone, Copy)]
pub struct AccountsRepository<'a> {
    client: &'a AmoClient,
}

impl<'a> AccountsRepository<'a> {
    pub fn new(client: &'a AmoClient) -> Self {
        Self { client }
    }
}

impl Accounts for AccountsRepository<'_> {
    #[instrument(skip(self))]
    async fn current(&self, with: &str) -> Result<Account> {
        read_one(self.client, &Endpoint::ACCOUNTS, with).await
    }
}
