use thiserror::Error;

/// Errors that can occur during a remote lookup.
#[derive(Debug, Error)]
pub enum ClientError {
  /// The request could not be sent or its body could not be read.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("unexpected status {status} from {url}")]
  Status { status: u16, url: String },

  /// The payload does not have the expected shape.
  #[error("invalid response: {message}")]
  InvalidResponse { message: String },

  /// The configured base URL cannot carry request paths.
  #[error("invalid url '{url}': {message}")]
  InvalidUrl { url: String, message: String },

  /// The remote service is temporarily unavailable.
  #[error("service unavailable: {message}")]
  Unavailable { message: String },
}

impl ClientError {
  /// Create an invalid response error.
  pub fn invalid_response(message: impl Into<String>) -> Self {
    Self::InvalidResponse {
      message: message.into(),
    }
  }

  /// Create an unavailable error.
  pub fn unavailable(message: impl Into<String>) -> Self {
    Self::Unavailable {
      message: message.into(),
    }
  }

  /// Whether retrying the same request may succeed.
  pub fn is_transient(&self) -> bool {
    match self {
      ClientError::Http(e) => e.is_timeout() || e.is_connect(),
      ClientError::Status { status, .. } => *status >= 500 || *status == 429,
      ClientError::Unavailable { .. } => true,
      ClientError::InvalidResponse { .. } | ClientError::InvalidUrl { .. } => false,
    }
  }
}
