//! Wizard settings.
//!
//! Settings are read from a JSON file. Every field has a default so that a
//! partial (or empty) document is valid:
//!
//! ```json
//! {
//!   "base_url": "https://ligoj.example.com/rest/",
//!   "request_timeout_ms": 5000,
//!   "retry": { "max_retry_attempts": 3, "backoff": "linear", "delay_ms": 100 },
//!   "messages": { "loading": "Searching…" }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardSettings {
  /// Base URL of the REST API, remote paths are appended to it.
  pub base_url: String,
  /// Timeout applied to every remote request.
  pub request_timeout_ms: u64,
  pub retry: RetryPolicy,
  pub messages: Messages,
}

impl Default for WizardSettings {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8080/ligoj/rest/".to_string(),
      request_timeout_ms: 10_000,
      retry: RetryPolicy::default(),
      messages: Messages::default(),
    }
  }
}

impl WizardSettings {
  pub fn request_timeout(&self) -> Duration {
    Duration::from_millis(self.request_timeout_ms)
  }
}

/// Retry policy for transient failures of the remote existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
  /// Retries after the first attempt. Zero disables retrying.
  pub max_retry_attempts: u32,
  pub backoff: RetryBackoff,
  /// Base delay between attempts.
  pub delay_ms: u64,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retry_attempts: 2,
      backoff: RetryBackoff::Exponential,
      delay_ms: 200,
    }
  }
}

impl RetryPolicy {
  /// A policy that never retries.
  pub fn none() -> Self {
    Self {
      max_retry_attempts: 0,
      ..Self::default()
    }
  }

  /// Delay before the given retry (1-based).
  pub fn delay(&self, retry: u32) -> Duration {
    let retry = retry.max(1);
    let millis = match self.backoff {
      RetryBackoff::Constant => self.delay_ms,
      RetryBackoff::Linear => self.delay_ms.saturating_mul(u64::from(retry)),
      RetryBackoff::Exponential => self
        .delay_ms
        .saturating_mul(1u64.checked_shl(retry - 1).unwrap_or(u64::MAX)),
    };
    Duration::from_millis(millis)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryBackoff {
  Constant,
  Linear,
  Exponential,
}

/// User-facing strings the plug-in needs from the host message table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
  /// Shown while a remote search or check is in flight.
  pub loading: String,
  pub copy_clipboard: String,
}

impl Default for Messages {
  fn default() -> Self {
    Self {
      loading: "Loading…".to_string(),
      copy_clipboard: "Copy to clipboard".to_string(),
    }
  }
}
