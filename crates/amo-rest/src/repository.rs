//! Request shapes shared by the resource repositories.

use amocrm_client::{require_record, AmoClient, Endpoint, Envelope, Identified, RequestMethod};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Send a batch as a bare JSON array and unwrap the `_embedded` answer.
/// An empty body yields `E::default()`.
pub(crate) async fn write_batch<T, E>(
    client: &AmoClient,
    endpoint: &Endpoint,
    method: RequestMethod,
    items: &[T],
) -> Result<E>
where
    T: Serialize,
    E: DeserializeOwned + Default,
{
    let envelope: Option<Envelope<E>> = client.send_json(endpoint, method, items).await?;
    Ok(envelope.unwrap_or_default().embedded)
}

/// GET a list endpoint and unwrap the `_embedded` answer. An empty body
/// yields `E::default()`.
pub(crate) async fn read_list<E>(
    client: &AmoClient,
    endpoint: &Endpoint,
    query: &[(&str, &str)],
) -> Result<E>
where
    E: DeserializeOwned + Default,
{
    let envelope: Option<Envelope<E>> = client.get_json(endpoint, query).await?;
    Ok(envelope.unwrap_or_default().embedded)
}

/// GET a single record, optionally with `?with=`. Fails with `NotFound`
/// when the answer is empty or carries no id.
pub(crate) async fn read_one<T>(client: &AmoClient, endpoint: &Endpoint, with: &str) -> Result<T>
where
    T: DeserializeOwned + Identified,
{
    let with_query = [("with", with)];
    let query: &[(&str, &str)] = if with.is_empty() { &[] } else { &with_query };

    let record: Option<T> = client.get_json(endpoint, query).await?;
    Ok(require_record(record)?)
}
