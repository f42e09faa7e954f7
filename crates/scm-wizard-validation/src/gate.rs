//! Submission gating.
//!
//! The validator's immediate `true` only lets the user move on while the
//! remote check runs. Submission itself is decided here: in create mode the
//! repository must be accepted for exactly the identifier in the field.

use scm_wizard_config::{FormMode, ParameterDef, ids};
use scm_wizard_registry::Form;
use thiserror::Error;

use crate::session::ValidationSession;
use crate::state::{ValidationState, Violation};

/// Reasons a form cannot be submitted yet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
  #[error("missing mandatory parameters: {}", .parameters.join(", "))]
  Missing { parameters: Vec<String> },

  #[error("repository '{identifier}' is still being checked")]
  Pending { identifier: String },

  #[error("repository rejected: {violation}")]
  Rejected { violation: Violation },

  #[error("repository '{identifier}' could not be checked: {reason}")]
  Unavailable { identifier: String, reason: String },

  #[error("repository identifier has not been validated")]
  NotValidated,
}

/// Decides whether a form may be submitted.
#[derive(Debug, Clone)]
pub struct SubmissionGate {
  mode: FormMode,
  mandatory: Vec<String>,
}

impl SubmissionGate {
  pub fn new(mode: FormMode, parameters: &[ParameterDef]) -> Self {
    Self {
      mode,
      mandatory: parameters
        .iter()
        .filter(|p| p.mandatory)
        .map(|p| p.id.clone())
        .collect(),
    }
  }

  pub fn check(&self, form: &Form, session: &ValidationSession) -> Result<(), SubmitError> {
    let missing: Vec<String> = self
      .mandatory
      .iter()
      .filter(|id| form.value(id).is_none_or(|v| v.trim().is_empty()))
      .cloned()
      .collect();
    if !missing.is_empty() {
      return Err(SubmitError::Missing {
        parameters: missing,
      });
    }

    let repository = form.value(ids::REPOSITORY).unwrap_or_default();
    if !self.mode.is_create() {
      return if repository.trim().is_empty() {
        Err(SubmitError::Missing {
          parameters: vec![ids::REPOSITORY.to_string()],
        })
      } else {
        Ok(())
      };
    }

    match session.state(ids::REPOSITORY) {
      ValidationState::Accepted { identifier } if identifier == repository => Ok(()),
      ValidationState::Accepted { .. } | ValidationState::Idle => Err(SubmitError::NotValidated),
      ValidationState::Pending { identifier, .. } => Err(SubmitError::Pending { identifier }),
      ValidationState::Rejected { violation } => Err(SubmitError::Rejected { violation }),
      ValidationState::Unavailable { identifier, reason } => {
        Err(SubmitError::Unavailable { identifier, reason })
      }
    }
  }
}
