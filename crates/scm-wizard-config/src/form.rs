use serde::{Deserialize, Serialize};

/// The wizard mode a form is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
  /// A new repository is created; its identifier is computed.
  Create,
  /// An existing subscription is edited.
  Edit,
  /// An existing repository is linked to the subscription.
  Link,
}

impl FormMode {
  pub fn is_create(self) -> bool {
    matches!(self, FormMode::Create)
  }
}

/// Scope of a subscription form: the mode, the tool type and the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
  pub mode: FormMode,
  /// Tool type, e.g. "git" or "svn".
  #[serde(rename = "type")]
  pub service_type: String,
  /// Organizational node remote lookups are scoped to.
  pub node: String,
}

impl FormConfig {
  pub fn new(mode: FormMode, service_type: impl Into<String>, node: impl Into<String>) -> Self {
    Self {
      mode,
      service_type: service_type.into(),
      node: node.into(),
    }
  }
}

/// The subscription (project) the form is opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionModel {
  /// Numeric model id, used to scope group searches.
  pub id: u32,
  /// Stable package key; mandatory prefix of computed repository identifiers.
  pub pkey: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_form_config_uses_type_key() {
    let config: FormConfig = serde_json::from_value(serde_json::json!({
      "mode": "create",
      "type": "git",
      "node": "service:scm:git:dev"
    }))
    .unwrap();

    assert_eq!(config.mode, FormMode::Create);
    assert_eq!(config.service_type, "git");
    assert!(config.mode.is_create());
    assert!(!FormMode::Link.is_create());
  }
}
