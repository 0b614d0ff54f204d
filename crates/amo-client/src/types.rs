//! Response shapes shared by every amoCRM resource.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// The `{"_embedded": {...}}` wrapper around list and create/update answers.
///
/// `T` is a resource-specific struct naming the plural key, e.g.
/// `struct Leads { leads: Vec<Lead> }`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "_embedded", default)]
    pub embedded: T,
}

/// A record carrying a server-assigned id.
pub trait Identified {
    /// The record id; `None` when the server left it out.
    fn id(&self) -> Option<u64>;
}

/// Turn a decoded answer into a record, failing with
/// [`ErrorKind::NoRecord`] when the body was empty or the id is absent or
/// zero.
pub fn require_record<T: Identified>(record: Option<T>) -> Result<T> {
    match record {
        Some(record) if record.id().is_some_and(|id| id != 0) => Ok(record),
        _ => Err(Error::new(ErrorKind::NoRecord)),
    }
}

/// Stable ascending sort by id. Records without an id sort first.
pub fn sort_by_id<T: Identified>(records: &mut [T]) {
    records.sort_by_key(|r| r.id().unwrap_or(0));
}
