//! Endpoint registry.
//!
//! An [`Endpoint`] is a resource path template such as `leads/{id}`. It turns
//! into a concrete URL path with [`Endpoint::path`]:
//!
//! ```
//! use amocrm_client::Endpoint;
//!
//! assert_eq!(Endpoint::LEADS.path(), "/api/v4/leads");
//! assert_eq!(Endpoint::lead(42).path(), "/api/v4/leads/42");
//! assert_eq!(Endpoint::EVENTS_V2.path(), "/api/v2/events/");
//! ```

use std::borrow::Cow;
use std::fmt;

/// Version of the amoCRM REST API used for every endpoint except events v2.
pub const API_VERSION: u32 = 4;

const ID_PLACEHOLDER: &str = "{id}";

/// A resource path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(Cow<'static, str>);

impl Endpoint {
    pub const ACCOUNTS: Endpoint = Endpoint::from_static("accounts");

    pub const LEADS: Endpoint = Endpoint::from_static("leads");
    pub const LEAD: Endpoint = Endpoint::from_static("leads/{id}");
    pub const PIPELINES: Endpoint = Endpoint::from_static("leads/pipelines");

    pub const CONTACTS: Endpoint = Endpoint::from_static("contacts");
    pub const CONTACT: Endpoint = Endpoint::from_static("contacts/{id}");

    pub const CALLS: Endpoint = Endpoint::from_static("calls");

    /// Events live on the legacy v2 API, see [`Endpoint::path_for_version`].
    pub const EVENTS_V2: Endpoint = Endpoint::from_static("events");

    /// A template known at compile time.
    pub const fn from_static(template: &'static str) -> Self {
        Self(Cow::Borrowed(template))
    }

    /// An arbitrary resource template.
    pub fn new(template: impl Into<String>) -> Self {
        Self(Cow::Owned(template.into()))
    }

    /// `leads/{id}` with the id filled in.
    pub fn lead(id: u64) -> Self {
        Self::LEAD.with_id(id)
    }

    /// `contacts/{id}` with the id filled in.
    pub fn contact(id: u64) -> Self {
        Self::CONTACT.with_id(id)
    }

    /// Replace the first `{id}` placeholder with the decimal id.
    ///
    /// Templates without a placeholder are returned unchanged.
    pub fn with_id(&self, id: u64) -> Self {
        if !self.0.contains(ID_PLACEHOLDER) {
            return self.clone();
        }
        Self(Cow::Owned(self.0.replacen(ID_PLACEHOLDER, &id.to_string(), 1)))
    }

    /// The resource template as written.
    pub fn resource(&self) -> &str {
        &self.0
    }

    /// True for the events endpoint that lives on the v2 API.
    pub fn is_events_v2(&self) -> bool {
        *self == Self::EVENTS_V2
    }

    /// URL path under the current [`API_VERSION`].
    pub fn path(&self) -> String {
        self.path_for_version(API_VERSION)
    }

    /// URL path under the given API version.
    ///
    /// Events v2 ignores `version`: it is always `/api/v2/events/`, trailing
    /// slash included.
    pub fn path_for_version(&self, version: u32) -> String {
        if self.is_events_v2() {
            return format!("/api/v2/{}/", self.0);
        }

        format!("/api/v{}/{}", version, self.0)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
