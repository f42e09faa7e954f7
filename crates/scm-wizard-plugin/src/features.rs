//! Link to a subscribed repository, with its copy-to-clipboard text.

use std::collections::HashMap;

use scm_wizard_config::{Messages, ids};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureLink {
  /// Repository URL: the tool URL followed by the repository name.
  pub href: String,
  pub copy_text: String,
  pub copy_tooltip: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub help: Option<String>,
}

impl FeatureLink {
  /// Build the link from subscription parameters, e.g. `service:scm:git:url`
  /// and `service:scm:git:repository`. Both must be present.
  pub fn from_parameters(
    service_type: &str,
    parameters: &HashMap<String, String>,
    messages: &Messages,
  ) -> Option<Self> {
    let get = |suffix: &str| {
      parameters
        .get(&ids::typed(service_type, suffix))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
    };

    let url = get("url")?;
    let repository = get("repository")?;
    let href = if url.ends_with('/') {
      format!("{}{}", url, repository)
    } else {
      format!("{}/{}", url, repository)
    };

    Some(Self {
      copy_text: href.clone(),
      href,
      copy_tooltip: messages.copy_clipboard.clone(),
      help: get("help").map(str::to_string),
    })
  }
}
