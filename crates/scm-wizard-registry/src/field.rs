//! Rendered field model.

use serde::{Deserialize, Serialize};

/// The control a provider produced for a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
  /// Free-text input.
  Text,
  /// Single selection among remote search results.
  RemoteSelect(SelectBinding),
  /// Multiple selection among remote search results.
  MultiSelect(MultiSelectOptions),
}

/// Binding of a field to a remote search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectBinding {
  /// Endpoint path relative to the REST base, ending with '/'.
  /// The node and the encoded search term are appended to it.
  pub endpoint: String,
  pub node: String,
  /// Link mode: only an existing remote entry can be selected.
  pub link: bool,
}

impl SelectBinding {
  /// Search path for a term, e.g. `service/scm/git/{node}/{term}`.
  pub fn search_path(&self, term: &str) -> String {
    format!("{}{}/{}", self.endpoint, self.node, term)
  }
}

/// Configuration of a remote multi-select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSelectOptions {
  pub binding: SelectBinding,
  pub multiple: bool,
  /// Searches are not issued below this many characters.
  pub minimum_input_length: usize,
  /// Result field displayed for both results and selections.
  pub display_field: String,
  /// Whether the user may create entries absent from the results.
  pub allow_create: bool,
  /// Text shown while a search is in flight.
  pub searching_text: String,
}

impl MultiSelectOptions {
  /// Whether a search should be issued for the given term.
  pub fn accepts_term(&self, term: &str) -> bool {
    term.chars().count() >= self.minimum_input_length
  }
}

/// A rendered parameter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHandle {
  pub id: String,
  pub value: String,
  pub readonly: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub control: Control,
}

impl FieldHandle {
  /// A plain, editable text field.
  pub fn text(id: impl Into<String>, description: Option<String>) -> Self {
    Self {
      id: id.into(),
      value: String::new(),
      readonly: false,
      description,
      control: Control::Text,
    }
  }

  pub fn binding(&self) -> Option<&SelectBinding> {
    match &self.control {
      Control::Text => None,
      Control::RemoteSelect(binding) => Some(binding),
      Control::MultiSelect(options) => Some(&options.binding),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_search_path() {
    let binding = SelectBinding {
      endpoint: "service/scm/git/".to_string(),
      node: "service:scm:git:dev".to_string(),
      link: true,
    };
    assert_eq!(
      binding.search_path("portal"),
      "service/scm/git/service:scm:git:dev/portal"
    );
  }

  #[test]
  fn test_accepts_term_counts_chars() {
    let options = MultiSelectOptions {
      binding: SelectBinding {
        endpoint: "service/id/ldap/group/subscriptions/1/".to_string(),
        node: "dev".to_string(),
        link: false,
      },
      multiple: true,
      minimum_input_length: 2,
      display_field: "name".to_string(),
      allow_create: false,
      searching_text: "Loading…".to_string(),
    };
    assert!(!options.accepts_term(""));
    assert!(!options.accepts_term("é"));
    assert!(options.accepts_term("éa"));
  }
}
