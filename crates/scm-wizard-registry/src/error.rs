use thiserror::Error;

/// Errors raised when the host edits a rendered form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
  /// The parameter was never rendered in this form.
  #[error("unknown parameter: {id}")]
  UnknownParameter { id: String },

  /// The field is computed or locked and cannot be edited by the user.
  #[error("parameter '{id}' is read-only")]
  ReadOnly { id: String },
}
