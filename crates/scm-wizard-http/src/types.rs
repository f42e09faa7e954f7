use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// A selectable remote entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
  pub id: String,
  pub name: String,
}

impl NamedItem {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
    }
  }
}

/// Search endpoints answer either a bare array or a page wrapping it.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResults {
  Page { data: Vec<NamedItem> },
  Bare(Vec<NamedItem>),
}

/// Decode a search payload: `[{id, name}]` or `{data: [{id, name}]}`.
pub fn decode_results(value: Value) -> Result<Vec<NamedItem>, ClientError> {
  match serde_json::from_value(value) {
    Ok(SearchResults::Page { data }) | Ok(SearchResults::Bare(data)) => Ok(data),
    Err(e) => Err(ClientError::invalid_response(e.to_string())),
  }
}

/// Decode an existence payload into "already in use".
///
/// Accepts a JSON boolean, a number (non-zero means in use, as the script
/// exit codes returned by the back-end), the strings "true"/"false" and null.
pub fn decode_exists(value: &Value) -> Result<bool, ClientError> {
  match value {
    Value::Bool(b) => Ok(*b),
    Value::Null => Ok(false),
    Value::Number(n) => match n.as_i64() {
      Some(code) => Ok(code != 0),
      None => Err(ClientError::invalid_response(format!(
        "unexpected existence code: {}",
        n
      ))),
    },
    Value::String(s) => match s.trim() {
      "true" | "1" => Ok(true),
      "false" | "0" | "" => Ok(false),
      other => Err(ClientError::invalid_response(format!(
        "unexpected existence flag: {}",
        other
      ))),
    },
    other => Err(ClientError::invalid_response(format!(
      "unexpected existence payload: {}",
      other
    ))),
  }
}
