//! # amocrm-api
//!
//! An amoCRM API client library for Rust.
//!
//! This library provides typed access to the amoCRM REST API with OAuth 2.0
//! authorization and token persistence.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets) are redacted in Debug output
//! - Tracing/logging skips codes, tokens and secrets
//! - Token files are written with owner-only permissions on Unix
//!
//! ## Crates
//!
//! - **amocrm-client** - Request execution, endpoints, host binding, error mapping
//! - **amocrm-auth** - OAuth 2.0 authorization-code flow, token lifecycle, token storage
//! - **amocrm-rest** - The `AmoCrm` client and Leads, Pipelines, Contacts, Calls, Events, Accounts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use amocrm_api::rest::Leads;
//! use amocrm_api::{AmoCrm, FileTokenStorage, OAuthConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut crm = AmoCrm::new(OAuthConfig::from_env()?)?
//!         .with_storage(FileTokenStorage::new("mycompany")?);
//!     crm.set_domain("mycompany")?;
//!
//!     // Reuse the stored token, or exchange the code from the redirect
//!     crm.load_token_or_authorize("def502...").await?;
//!
//!     for lead in crm.leads().list(1).await? {
//!         println!("{:?}", lead.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use amocrm_auth as auth;
#[cfg(feature = "client")]
pub use amocrm_client as client;
#[cfg(feature = "rest")]
pub use amocrm_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use amocrm_auth::{FileTokenStorage, OAuthConfig, Token, TokenStorage};
#[cfg(feature = "client")]
pub use amocrm_client::{AccountHost, AmoClient, ClientConfig};
#[cfg(feature = "rest")]
pub use amocrm_rest::AmoCrm;
