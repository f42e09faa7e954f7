//! Validation states and rule violations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scope reported with repository violations.
pub const REPOSITORY_SCOPE: &str = "repository";

/// Validation rule that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
  /// The identifier does not start with the expected prefix.
  StartsWith,
  /// The identifier is already in use remotely.
  #[serde(rename = "already-exist")]
  AlreadyExist,
  /// A mandatory value is missing.
  #[serde(rename = "required")]
  Required,
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Rule::StartsWith => "StartsWith",
      Rule::AlreadyExist => "already-exist",
      Rule::Required => "required",
    };
    f.write_str(name)
  }
}

/// A rule violation with the parameters used to build its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
  pub rule: Rule,
  pub parameters: Vec<String>,
  pub scope: String,
}

impl Violation {
  pub fn starts_with(prefix: &str) -> Self {
    Self {
      rule: Rule::StartsWith,
      parameters: vec![prefix.to_string()],
      scope: REPOSITORY_SCOPE.to_string(),
    }
  }

  pub fn already_exist(field: &str, identifier: &str) -> Self {
    Self {
      rule: Rule::AlreadyExist,
      parameters: vec![field.to_string(), identifier.to_string()],
      scope: REPOSITORY_SCOPE.to_string(),
    }
  }

  pub fn required(field: &str) -> Self {
    Self {
      rule: Rule::Required,
      parameters: vec![field.to_string()],
      scope: REPOSITORY_SCOPE.to_string(),
    }
  }
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.rule, self.parameters.join(", "))
  }
}

/// The single state displayed for a validated field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ValidationState {
  /// Nothing shown.
  #[default]
  Idle,
  /// A remote check is in flight; a spinner and `message` are shown.
  Pending { identifier: String, message: String },
  /// The identifier is free.
  Accepted { identifier: String },
  /// The identifier violates a rule.
  Rejected { violation: Violation },
  /// The remote check could not be completed; the user may retry.
  Unavailable { identifier: String, reason: String },
}

impl ValidationState {
  pub fn is_pending(&self) -> bool {
    matches!(self, ValidationState::Pending { .. })
  }

  pub fn is_accepted(&self) -> bool {
    matches!(self, ValidationState::Accepted { .. })
  }

  pub fn violation(&self) -> Option<&Violation> {
    match self {
      ValidationState::Rejected { violation } => Some(violation),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_rule_names() {
    assert_eq!(serde_json::to_value(Rule::AlreadyExist).unwrap(), json!("already-exist"));
    assert_eq!(serde_json::to_value(Rule::StartsWith).unwrap(), json!("StartsWith"));
    assert_eq!(Rule::AlreadyExist.to_string(), "already-exist");
  }

  #[test]
  fn test_state_serialization() {
    let state = ValidationState::Rejected {
      violation: Violation::already_exist("service:scm:repository", "eng-portal"),
    };
    assert_eq!(
      serde_json::to_value(&state).unwrap(),
      json!({
        "state": "rejected",
        "violation": {
          "rule": "already-exist",
          "parameters": ["service:scm:repository", "eng-portal"],
          "scope": "repository"
        }
      })
    );
  }
}
