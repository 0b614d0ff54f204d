//! # amocrm-client
//!
//! Core HTTP client infrastructure for the amoCRM API.
//!
//! This crate provides:
//! - A buffered HTTP transport that sends each request once (no retry)
//! - The endpoint registry and its `{id}` substitution
//! - The account host binding (`https://{domain}.{api_host}`)
//! - An authenticated request executor shared by every repository
//! - The error taxonomy used across the workspace
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (amocrm-rest repositories, amocrm-auth token exchange)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        AmoClient                            │
//! │  - Holds host binding + access token + HTTP client          │
//! │  - Resolves endpoints, attaches bearer auth                 │
//! │  - Typed JSON methods (get_json, post_json, patch_json)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      AmoHttpClient                          │
//! │  - Raw HTTP, body fully read before returning               │
//! │  - Non-2xx mapped to ErrorKind::Http                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use amocrm_client::{AmoClient, Endpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), amocrm_client::Error> {
//!     let mut client = AmoClient::new()?;
//!     client.set_domain("mycompany")?;
//!     client.set_access_token(std::env::var("AMOCRM_ACCESS_TOKEN").unwrap_or_default());
//!
//!     let account: Option<serde_json::Value> =
//!         client.get_json(&Endpoint::ACCOUNTS, &[]).await?;
//!     println!("{account:?}");
//!     Ok(())
//! }
//! ```

mod amo_client;
mod client;
mod config;
mod endpoint;
mod error;
mod host;
mod request;
mod response;
mod types;

pub use amo_client::{AmoClient, INVALID_TOKEN};
pub use client::AmoHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use endpoint::{Endpoint, API_VERSION};
pub use error::{Error, ErrorKind, Result};
pub use host::{AccountHost, DEFAULT_API_HOST};
pub use request::{RequestBuilder, RequestMethod};
pub use response::Response;
pub use types::{require_record, sort_by_id, Envelope, Identified};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("amocrm-api/", env!("CARGO_PKG_VERSION"));
