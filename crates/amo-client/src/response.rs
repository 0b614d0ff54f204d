//! Buffered HTTP response.
//!
//! The transport reads the whole body before handing a [`Response`] back,
//! so the underlying connection is released by the time any caller sees it.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    /// Create a response from its parts. Header names are lowercased.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();

        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(Self::new(status, headers, body))
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Returns true if the body has zero bytes.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// A zero-byte body yields `Ok(None)`: "no content" is a valid answer
    /// (e.g. `204` on an empty list page), distinct from a malformed body,
    /// which yields a JSON error.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if self.body.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&self.body).map(Some).map_err(Into::into)
    }

    /// Decode the body as JSON, falling back to `T::default()` on an empty body.
    pub fn json_or_default<T: DeserializeOwned + Default>(&self) -> Result<T> {
        Ok(self.json()?.unwrap_or_default())
    }

    /// Convert a non-2xx response into a transport error carrying the status
    /// and raw body.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        Err(Error::new(ErrorKind::Http {
            status: self.status,
            body: self.text(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, serde::Deserialize, PartialEq)]
    struct Payload {
        #[serde(default)]
        id: u64,
    }

    #[test]
    fn test_empty_body_is_not_an_error() {
        let response = Response::new(204, Vec::new(), Bytes::new());
        let decoded: Option<Payload> = response.json().unwrap();
        assert!(decoded.is_none());

        let defaulted: Payload = response.json_or_default().unwrap();
        assert_eq!(defaulted, Payload::default());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let response = Response::new(200, Vec::new(), "{not json");
        let err = response.json::<Payload>().unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_valid_body_decodes() {
        let response = Response::new(200, Vec::new(), r#"{"id": 7}"#);
        let decoded: Payload = response.json_or_default().unwrap();
        assert_eq!(decoded.id, 7);
    }

    #[test]
    fn test_error_for_status_carries_status_and_body() {
        let response = Response::new(404, Vec::new(), r#"{"title":"Not Found"}"#);
        let err = response.error_for_status().unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(r#"{"title":"Not Found"}"#));

        let ok = Response::new(200, Vec::new(), "{}").error_for_status();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = Response::new(
            200,
            vec![("Content-Type".to_string(), "application/hal+json".to_string())],
            "{}",
        );
        assert_eq!(response.content_type(), Some("application/hal+json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/hal+json"));
    }
}
