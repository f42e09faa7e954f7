use serde::{Deserialize, Serialize};

/// Definition of a subscription parameter as declared by the host wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDef {
  pub id: String,
  /// Static help text shown under the field.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Whether the parameter must be filled before submission.
  #[serde(default)]
  pub mandatory: bool,
}

impl ParameterDef {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      description: None,
      mandatory: false,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn mandatory(mut self) -> Self {
    self.mandatory = true;
    self
  }
}
