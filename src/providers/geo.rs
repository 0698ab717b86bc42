//! IP geolocation service using ip-api.com.

use crate::error::LookupError;
use crate::input::Query;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Base URL of the ip-api.com JSON endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json";

/// Field-selection bitmask sent with every request.
///
/// Selects status, message, continent, country, regionName, city, district,
/// zip, lat, lon, timezone, currency, isp, org, as, mobile, hosting, query.
pub const DEFAULT_FIELDS: u32 = 26_865_657;

/// Raw geolocation data for one query.
///
/// Whatever object the service returned, in the order it returned it. No
/// schema is imposed; nested objects are kept as-is.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct LookupResult(Map<String, Value>);

impl LookupResult {
  pub const fn fields(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// Request status ("success" or "fail") when the service included it.
  pub fn status(&self) -> Option<&str> {
    self.get("status").and_then(Value::as_str)
  }

  /// Failure message (if status is "fail")
  pub fn message(&self) -> Option<&str> {
    self.get("message").and_then(Value::as_str)
  }

  /// False only when the service explicitly reported a failed query.
  pub fn is_success(&self) -> bool {
    self.status() != Some("fail")
  }
}

impl TryFrom<Value> for LookupResult {
  type Error = LookupError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::Object(map) => Ok(Self(map)),
      Value::Null => Err(LookupError::NotAnObject("null")),
      Value::Bool(_) => Err(LookupError::NotAnObject("boolean")),
      Value::Number(_) => Err(LookupError::NotAnObject("number")),
      Value::String(_) => Err(LookupError::NotAnObject("string")),
      Value::Array(_) => Err(LookupError::NotAnObject("array")),
    }
  }
}

/// Client for one geolocation endpoint.
#[derive(Debug, Clone)]
pub struct LookupClient {
  http: Client,
  endpoint: String,
  fields: u32,
}

impl LookupClient {
  pub fn new(http: Client, endpoint: impl Into<String>, fields: u32) -> Self {
    let endpoint = endpoint.into().trim_end_matches('/').to_string();
    Self {
      http,
      endpoint,
      fields,
    }
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  pub const fn field_mask(&self) -> u32 {
    self.fields
  }

  /// URL for `query`, without the `fields` parameter.
  ///
  /// The query is embedded verbatim, so `OwnIp` yields a trailing slash.
  pub fn url_for(&self, query: &Query) -> String {
    format!("{}/{}", self.endpoint, query.as_str())
  }

  /// Fetches geolocation for an IP address, a domain, or the caller.
  ///
  /// The query also travels as a JSON body `{"query": ...}`.
  ///
  /// # Errors
  /// - [`LookupError::Status`] for any reply other than 200 OK
  /// - [`LookupError::Transport`] if the request could not be sent
  /// - [`LookupError::Body`] if the body could not be read
  /// - [`LookupError::Decode`] / [`LookupError::NotAnObject`] for a body
  ///   that is not a JSON object
  ///
  /// # Example
  /// ```ignore
  /// use iplook::providers::geo::{LookupClient, DEFAULT_ENDPOINT, DEFAULT_FIELDS};
  /// let client = LookupClient::new(reqwest::Client::new(), DEFAULT_ENDPOINT, DEFAULT_FIELDS);
  /// let info = client.fetch(&Query::Ip("8.8.8.8".into())).await?;
  /// ```
  pub async fn fetch(&self, query: &Query) -> Result<LookupResult, LookupError> {
    let url = self.url_for(query);
    debug!(%url, fields = self.fields, "sending geolocation request");

    let response = self
      .http
      .get(&url)
      .query(&[("fields", self.fields)])
      .json(&json!({ "query": query.as_str() }))
      .send()
      .await
      .map_err(|source| LookupError::Transport {
        url: url.clone(),
        source,
      })?;

    let status = response.status();
    debug!(%status, "geolocation response received");
    if status != StatusCode::OK {
      warn!(%url, %status, "geolocation request rejected");
      return Err(LookupError::Status(status));
    }

    let body = response.text().await.map_err(LookupError::Body)?;
    let value: Value = serde_json::from_str(&body)?;
    LookupResult::try_from(value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::FakeServer;

  fn client_for(server: &FakeServer) -> LookupClient {
    LookupClient::new(Client::new(), server.endpoint(), DEFAULT_FIELDS)
  }

  #[test]
  fn test_url_embeds_query_verbatim() {
    let client = LookupClient::new(Client::new(), DEFAULT_ENDPOINT, DEFAULT_FIELDS);
    assert_eq!(
      client.url_for(&Query::Ip("8.8.8.8".into())),
      "http://ip-api.com/json/8.8.8.8"
    );
    assert_eq!(
      client.url_for(&Query::Domain("example.com".into())),
      "http://ip-api.com/json/example.com"
    );
    assert_eq!(client.url_for(&Query::OwnIp), "http://ip-api.com/json/");
  }

  #[test]
  fn test_trailing_slash_on_endpoint_is_dropped() {
    let client = LookupClient::new(Client::new(), "http://localhost/json/", 1);
    assert_eq!(client.endpoint(), "http://localhost/json");
    assert_eq!(client.field_mask(), 1);
  }

  #[test]
  fn test_lookup_result_requires_object() {
    assert!(LookupResult::try_from(json!({"status": "success"})).is_ok());
    assert!(matches!(
      LookupResult::try_from(json!([1, 2])),
      Err(LookupError::NotAnObject("array"))
    ));
    assert!(matches!(
      LookupResult::try_from(Value::Null),
      Err(LookupError::NotAnObject("null"))
    ));
  }

  #[test]
  fn test_status_helpers() {
    let ok = LookupResult::try_from(json!({"status": "success"})).unwrap();
    assert!(ok.is_success());
    assert_eq!(ok.message(), None);

    let failed = LookupResult::try_from(
      json!({"status": "fail", "message": "invalid query"}),
    )
    .unwrap();
    assert!(!failed.is_success());
    assert_eq!(failed.message(), Some("invalid query"));
  }

  #[tokio::test]
  async fn test_fetch_sends_fields_and_body() {
    let server = FakeServer::start(
      "200 OK",
      r#"{"status":"success","country":"United States","query":"8.8.8.8"}"#,
    )
    .await;
    let client = client_for(&server);

    let result = client.fetch(&Query::Ip("8.8.8.8".into())).await.unwrap();
    assert_eq!(result.status(), Some("success"));
    assert_eq!(result.get("country"), Some(&json!("United States")));

    let request = server.request().await;
    assert!(
      request.starts_with("GET /json/8.8.8.8?fields=26865657 HTTP/1.1\r\n"),
      "unexpected request line: {request}"
    );
    assert!(request.ends_with(r#"{"query":"8.8.8.8"}"#));
  }

  #[tokio::test]
  async fn test_fetch_own_ip_uses_empty_path_segment() {
    let server =
      FakeServer::start("200 OK", r#"{"status":"success","query":"203.0.113.9"}"#)
        .await;
    let client = client_for(&server);

    let result = client.fetch(&Query::OwnIp).await.unwrap();
    assert_eq!(result.get("query"), Some(&json!("203.0.113.9")));

    let request = server.request().await;
    assert!(request.starts_with("GET /json/?fields=26865657 HTTP/1.1\r\n"));
    assert!(request.ends_with(r#"{"query":""}"#));
  }

  #[tokio::test]
  async fn test_fetch_non_200_is_status_error() {
    let server = FakeServer::start("404 Not Found", "{}").await;
    let client = client_for(&server);

    let err = client
      .fetch(&Query::Domain("example.com".into()))
      .await
      .unwrap_err();
    assert!(matches!(err, LookupError::Status(s) if s == StatusCode::NOT_FOUND));
    assert!(err.is_recoverable());
  }

  #[tokio::test]
  async fn test_fetch_malformed_json_is_fatal() {
    let server = FakeServer::start("200 OK", "<html>oops</html>").await;
    let client = client_for(&server);

    let err = client.fetch(&Query::Ip("1.1.1.1".into())).await.unwrap_err();
    assert!(matches!(err, LookupError::Decode(_)));
    assert!(!err.is_recoverable());
  }

  #[tokio::test]
  async fn test_fetch_unreachable_host_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
      LookupClient::new(Client::new(), format!("http://{addr}/json"), DEFAULT_FIELDS);
    let err = client.fetch(&Query::OwnIp).await.unwrap_err();
    assert!(matches!(err, LookupError::Transport { .. }));
  }
}
