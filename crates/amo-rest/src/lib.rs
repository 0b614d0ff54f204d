//! # amocrm-rest
//!
//! amoCRM REST API client.
//!
//! ## Features
//!
//! - **Authorization** - Three explicit entry points over the OAuth token state
//! - **Leads** - Create, update, page through and fetch leads
//! - **Pipelines** - List pipelines with their statuses
//! - **Contacts** - Create, update, page through and fetch contacts
//! - **Calls** - Log calls
//! - **Events (v2)** - Raise incoming call notifications
//! - **Accounts** - Read the current account
//!
//! ## Example
//!
//! ```rust,ignore
//! use amocrm_rest::{AmoCrm, FileTokenStorage, Leads, OAuthConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), amocrm_rest::Error> {
//!     let mut crm = AmoCrm::new(OAuthConfig::from_env()?)?
//!         .with_storage(FileTokenStorage::new("mycompany")?);
//!     crm.set_domain("mycompany")?;
//!     crm.load_token_or_authorize("def502...").await?;
//!
//!     for lead in crm.leads().list(1).await? {
//!         println!("{:?} {:?}", lead.id, lead.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod calls;
mod client;
pub mod contacts;
pub mod custom_fields;
mod error;
pub mod events;
pub mod leads;
pub mod pipelines;
mod repository;

// Main client
pub use client::AmoCrm;

// Error types
pub use error::{Error, ErrorKind, Result};

// Repositories
pub use accounts::{Account, Accounts, AccountsRepository};
pub use calls::{Call, Calls, CallsRepository};
pub use contacts::{Contact, Contacts, ContactsRepository};
pub use custom_fields::{find_text, find_value, CustomField, FieldValue};
pub use events::{EventItem, EventV2, EventsV2, EventsV2Repository};
pub use leads::{Lead, Leads, LeadsRepository};
pub use pipelines::{Pipeline, PipelineStatus, Pipelines, PipelinesRepository};

// Re-export the types users need to build a client
pub use amocrm_auth::{
    random_state, AuthorizeMode, FileTokenStorage, MemoryTokenStorage, OAuthConfig, Token,
    TokenStorage,
};
pub use amocrm_client::{AccountHost, ClientConfig, ClientConfigBuilder, Endpoint};
