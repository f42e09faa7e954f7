use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use scm_wizard_config::WizardSettings;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::ClientError;
use crate::types::{NamedItem, decode_exists, decode_results};

/// Remote lookups needed by the SCM subscription form.
#[async_trait]
pub trait ScmClient: Send + Sync {
  /// Whether a repository identifier is already in use on the node.
  async fn exists(
    &self,
    service_type: &str,
    node: &str,
    identifier: &str,
  ) -> Result<bool, ClientError>;

  /// Existing repositories of the node whose name matches the criteria.
  async fn search_repositories(
    &self,
    service_type: &str,
    node: &str,
    criteria: &str,
  ) -> Result<Vec<NamedItem>, ClientError>;

  /// Groups visible to the subscription that match the term.
  async fn search_groups(
    &self,
    model_id: u32,
    node: &str,
    term: &str,
  ) -> Result<Vec<NamedItem>, ClientError>;
}

/// [`ScmClient`] backed by the REST API.
///
/// Every path segment (identifier, criteria, term) is percent-encoded.
#[derive(Debug, Clone)]
pub struct HttpScmClient {
  client: Client,
  base: Url,
}

impl HttpScmClient {
  /// Create a client for the given REST base URL.
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
    let client = Client::builder().timeout(timeout).build()?;
    Self::with_client(client, base_url)
  }

  /// Create a client from wizard settings.
  pub fn from_settings(settings: &WizardSettings) -> Result<Self, ClientError> {
    Self::new(&settings.base_url, settings.request_timeout())
  }

  /// Create a client reusing a configured reqwest client.
  pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
    let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
      url: base_url.to_string(),
      message: e.to_string(),
    })?;
    if base.cannot_be_a_base() {
      return Err(ClientError::InvalidUrl {
        url: base_url.to_string(),
        message: "url cannot carry a path".to_string(),
      });
    }
    Ok(Self { client, base })
  }

  pub fn base(&self) -> &Url {
    &self.base
  }

  /// Append path segments to the base URL.
  pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = self.base.clone();
    {
      let mut path = url.path_segments_mut().map_err(|_| ClientError::InvalidUrl {
        url: self.base.to_string(),
        message: "url cannot carry a path".to_string(),
      })?;
      path.pop_if_empty().extend(segments);
    }
    Ok(url)
  }

  async fn get_json(&self, url: Url) -> Result<Value, ClientError> {
    debug!(url = %url, "remote request");
    let response = self
      .client
      .get(url.clone())
      .header(ACCEPT, "application/json")
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(ClientError::Status {
        status: status.as_u16(),
        url: url.to_string(),
      });
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
      return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| ClientError::invalid_response(e.to_string()))
  }
}

#[async_trait]
impl ScmClient for HttpScmClient {
  #[instrument(name = "scm_exists", skip(self))]
  async fn exists(
    &self,
    service_type: &str,
    node: &str,
    identifier: &str,
  ) -> Result<bool, ClientError> {
    let url = self.endpoint(&["service", "scm", service_type, node, identifier, "exists"])?;
    let payload = self.get_json(url).await?;
    decode_exists(&payload)
  }

  #[instrument(name = "scm_search_repositories", skip(self))]
  async fn search_repositories(
    &self,
    service_type: &str,
    node: &str,
    criteria: &str,
  ) -> Result<Vec<NamedItem>, ClientError> {
    let url = self.endpoint(&["service", "scm", service_type, node, criteria])?;
    decode_results(self.get_json(url).await?)
  }

  #[instrument(name = "scm_search_groups", skip(self))]
  async fn search_groups(
    &self,
    model_id: u32,
    node: &str,
    term: &str,
  ) -> Result<Vec<NamedItem>, ClientError> {
    let model_id = model_id.to_string();
    let url = self.endpoint(&[
      "service",
      "id",
      "ldap",
      "group",
      "subscriptions",
      &model_id,
      node,
      term,
    ])?;
    decode_results(self.get_json(url).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base: &str) -> HttpScmClient {
    HttpScmClient::new(base, Duration::from_secs(1)).unwrap()
  }

  #[test]
  fn test_endpoint_encodes_segments() {
    let client = client("http://localhost:8080/ligoj/rest/");
    let url = client
      .endpoint(&["service", "scm", "git", "dev", "eng-a b/c", "exists"])
      .unwrap();
    assert_eq!(
      url.as_str(),
      "http://localhost:8080/ligoj/rest/service/scm/git/dev/eng-a%20b%2Fc/exists"
    );
  }

  #[test]
  fn test_endpoint_without_trailing_slash() {
    let client = client("http://localhost:8080/rest");
    let url = client.endpoint(&["service", "scm"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/rest/service/scm");
  }

  #[test]
  fn test_rejects_non_base_url() {
    let result = HttpScmClient::new("mailto:dev@example.com", Duration::from_secs(1));
    assert!(matches!(result, Err(ClientError::InvalidUrl { .. })));
  }
}
