//! Live uniqueness validation of the computed repository identifier.

use std::sync::Arc;

use scm_wizard_config::{RetryPolicy, WizardSettings, ids};
use scm_wizard_http::{ClientError, ScmClient};
use scm_wizard_registry::{Form, Validator};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::naming::{check_naming_convention, derive_identifier};
use crate::session::{Generation, ValidationSession};
use crate::state::{ValidationState, Violation};

/// Where remote existence checks are scoped and which prefix is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckScope {
  pub service_type: String,
  pub node: String,
  /// Package key the identifier must start with.
  pub pkey: String,
}

/// Result of one synchronous validation pass.
#[derive(Debug)]
pub struct Trigger {
  /// Identifier written into the repository field.
  pub identifier: String,
  /// Immediate verdict: false when the naming convention failed.
  pub permitted: bool,
  /// The remote check issued by this pass, if any.
  pub check: Option<PendingCheck>,
}

/// A remote existence check in flight.
#[derive(Debug)]
pub struct PendingCheck {
  pub identifier: String,
  pub generation: Generation,
  handle: JoinHandle<CheckOutcome>,
}

impl PendingCheck {
  /// Wait for the check to finish.
  pub async fn wait(self) -> CheckOutcome {
    match self.handle.await {
      Ok(outcome) => outcome,
      Err(e) if e.is_panic() => {
        warn!(identifier = %self.identifier, generation = self.generation, "repository check panicked");
        CheckOutcome::Panicked
      }
      Err(_) => CheckOutcome::Cancelled,
    }
  }
}

/// What happened to a remote check once it finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
  /// The outcome was displayed.
  Applied(ValidationState),
  /// A newer pass exists; the outcome was discarded.
  Stale,
  /// The session closed before the check finished.
  Cancelled,
  /// The check task panicked; nothing was displayed.
  Panicked,
}

/// Validator bound to the organizational unit and project fields.
///
/// Each pass recomputes the repository identifier, locks it into the form,
/// checks the naming convention locally and, when that passes, checks
/// remotely that the identifier is not already in use.
pub struct UniquenessValidator {
  client: Arc<dyn ScmClient>,
  session: Arc<ValidationSession>,
  scope: CheckScope,
  retry: RetryPolicy,
  loading: String,
}

impl UniquenessValidator {
  pub fn new(
    client: Arc<dyn ScmClient>,
    session: Arc<ValidationSession>,
    scope: CheckScope,
    settings: &WizardSettings,
  ) -> Self {
    Self {
      client,
      session,
      scope,
      retry: settings.retry,
      loading: settings.messages.loading.clone(),
    }
  }

  pub fn session(&self) -> &Arc<ValidationSession> {
    &self.session
  }

  pub fn scope(&self) -> &CheckScope {
    &self.scope
  }

  /// Run one validation pass against the current form values.
  ///
  /// Returns before the remote check completes. Must be called within a
  /// Tokio runtime. A form without a repository field is left alone: nothing
  /// is validated and no request is issued.
  pub fn trigger(&self, form: &mut Form) -> Trigger {
    let identifier = derive_identifier(
      form.value(ids::OU).unwrap_or_default(),
      form.value(ids::PROJECT).unwrap_or_default(),
    );
    if !form.set_value(ids::REPOSITORY, identifier.as_str(), true) {
      debug!(
        session_id = %self.session.id(),
        identifier = %identifier,
        "form has no repository field, skipping validation"
      );
      return Trigger {
        identifier,
        permitted: true,
        check: None,
      };
    }
    let generation = self.session.begin(ids::REPOSITORY);

    if let Err(violation) = check_naming_convention(&identifier, &self.scope.pkey) {
      debug!(
        session_id = %self.session.id(),
        identifier = %identifier,
        pkey = %self.scope.pkey,
        "repository identifier violates naming convention"
      );
      self.session.add_error(ids::REPOSITORY, generation, violation);
      return Trigger {
        identifier,
        permitted: false,
        check: None,
      };
    }

    let check = self.issue(identifier.clone(), generation);
    Trigger {
      identifier,
      permitted: true,
      check: Some(check),
    }
  }

  /// Re-run the pass when the previous remote check could not be completed.
  pub fn retry(&self, form: &mut Form) -> Option<Trigger> {
    match self.session.state(ids::REPOSITORY) {
      ValidationState::Unavailable { identifier, .. } => {
        info!(session_id = %self.session.id(), identifier = %identifier, "retrying repository check");
        Some(self.trigger(form))
      }
      _ => None,
    }
  }

  fn issue(&self, identifier: String, generation: Generation) -> PendingCheck {
    self
      .session
      .add_message(ids::REPOSITORY, generation, &identifier, &self.loading);

    let client = self.client.clone();
    let session = self.session.clone();
    let scope = self.scope.clone();
    let retry = self.retry;
    let cancel = session.cancellation();
    let target = identifier.clone();
    let span = info_span!(
      "repository_check",
      session_id = %session.id(),
      identifier = %identifier,
      generation
    );

    let handle = tokio::spawn(
      async move {
        let result = tokio::select! {
          _ = cancel.cancelled() => return CheckOutcome::Cancelled,
          result = exists_with_retry(client.as_ref(), &scope, &target, retry) => result,
        };

        let (state, applied) = match result {
          Ok(true) => {
            let violation = Violation::already_exist(ids::REPOSITORY, &target);
            let applied = session.add_error(ids::REPOSITORY, generation, violation.clone());
            (ValidationState::Rejected { violation }, applied)
          }
          Ok(false) => {
            let applied = session.add_success(ids::REPOSITORY, generation, &target);
            (
              ValidationState::Accepted {
                identifier: target.clone(),
              },
              applied,
            )
          }
          Err(e) => {
            warn!(error = %e, "repository check failed");
            let reason = e.to_string();
            let applied = session.fail(ids::REPOSITORY, generation, &target, &reason);
            (
              ValidationState::Unavailable {
                identifier: target.clone(),
                reason,
              },
              applied,
            )
          }
        };

        if applied {
          info!(state = ?state, "repository check completed");
          CheckOutcome::Applied(state)
        } else if session.is_closed() {
          CheckOutcome::Cancelled
        } else {
          debug!("repository check outdated");
          CheckOutcome::Stale
        }
      }
      .instrument(span),
    );

    PendingCheck {
      identifier,
      generation,
      handle,
    }
  }
}

impl Validator for UniquenessValidator {
  fn validate(&self, form: &mut Form) -> bool {
    self.trigger(form).permitted
  }
}

/// Existence check, retrying transient failures per the policy.
async fn exists_with_retry(
  client: &dyn ScmClient,
  scope: &CheckScope,
  identifier: &str,
  policy: RetryPolicy,
) -> Result<bool, ClientError> {
  let mut retry = 0;
  loop {
    match client
      .exists(&scope.service_type, &scope.node, identifier)
      .await
    {
      Err(e) if e.is_transient() && retry < policy.max_retry_attempts => {
        retry += 1;
        warn!(error = %e, retry, "existence check failed, retrying");
        tokio::time::sleep(policy.delay(retry)).await;
      }
      result => return result,
    }
  }
}
