use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::ScmClient;
use crate::error::ClientError;
use crate::types::NamedItem;

/// Searches return at most this many results, as the REST API pages them.
const PAGE_SIZE: usize = 10;

/// In-memory [`ScmClient`].
///
/// Suitable for offline use or testing. Every request is recorded as its
/// unencoded path so callers can assert which lookups were issued.
#[derive(Debug, Default)]
pub struct InMemoryScmClient {
  existing: HashSet<String>,
  repositories: Vec<String>,
  groups: Vec<NamedItem>,
  /// Number of upcoming existence checks that fail as unavailable.
  failures: AtomicU32,
  requests: Mutex<Vec<String>>,
}

impl InMemoryScmClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Identifiers reported as already in use.
  pub fn with_existing<I, S>(mut self, identifiers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .existing
      .extend(identifiers.into_iter().map(Into::into));
    self
  }

  pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .repositories
      .extend(repositories.into_iter().map(Into::into));
    self
  }

  pub fn with_groups(mut self, groups: impl IntoIterator<Item = NamedItem>) -> Self {
    self.groups.extend(groups);
    self
  }

  /// Make the next `count` existence checks fail with a transient error.
  pub fn failing(self, count: u32) -> Self {
    self.failures.store(count, Ordering::SeqCst);
    self
  }

  /// Paths of all requests received so far.
  pub async fn requests(&self) -> Vec<String> {
    self.requests.lock().await.clone()
  }

  async fn record(&self, path: String) {
    self.requests.lock().await.push(path);
  }

  fn take_failure(&self) -> bool {
    self
      .failures
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
      .is_ok()
  }
}

fn matches(candidate: &str, term: &str) -> bool {
  candidate.to_lowercase().contains(&term.to_lowercase())
}

#[async_trait]
impl ScmClient for InMemoryScmClient {
  async fn exists(
    &self,
    service_type: &str,
    node: &str,
    identifier: &str,
  ) -> Result<bool, ClientError> {
    self
      .record(format!(
        "service/scm/{}/{}/{}/exists",
        service_type, node, identifier
      ))
      .await;
    if self.take_failure() {
      return Err(ClientError::unavailable("the proxy agent doesn't reply"));
    }
    Ok(self.existing.contains(identifier))
  }

  async fn search_repositories(
    &self,
    service_type: &str,
    node: &str,
    criteria: &str,
  ) -> Result<Vec<NamedItem>, ClientError> {
    self
      .record(format!("service/scm/{}/{}/{}", service_type, node, criteria))
      .await;
    Ok(
      self
        .repositories
        .iter()
        .filter(|r| matches(r, criteria))
        .take(PAGE_SIZE)
        .map(|r| NamedItem::new(r.as_str(), r.as_str()))
        .collect(),
    )
  }

  async fn search_groups(
    &self,
    model_id: u32,
    node: &str,
    term: &str,
  ) -> Result<Vec<NamedItem>, ClientError> {
    self
      .record(format!(
        "service/id/ldap/group/subscriptions/{}/{}/{}",
        model_id, node, term
      ))
      .await;
    Ok(
      self
        .groups
        .iter()
        .filter(|g| matches(&g.name, term))
        .take(PAGE_SIZE)
        .cloned()
        .collect(),
    )
  }
}
