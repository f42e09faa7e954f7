//! Validation feedback scoped to one open form.

use std::collections::HashMap;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::state::{ValidationState, Violation};

/// Tag of a validation pass. Only the latest generation of a field may
/// change what that field displays.
pub type Generation = u64;

/// Feedback currently displayed for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFeedback {
  pub generation: Generation,
  pub state: ValidationState,
}

/// Feedback of every validated field of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
  fields: HashMap<String, FieldFeedback>,
}

impl SessionState {
  pub fn feedback(&self, field: &str) -> Option<&FieldFeedback> {
    self.fields.get(field)
  }

  /// State of a field, `Idle` when it was never validated.
  pub fn state(&self, field: &str) -> ValidationState {
    self
      .fields
      .get(field)
      .map(|f| f.state.clone())
      .unwrap_or_default()
  }
}

/// Validation feedback of one form instance.
///
/// Created when the form opens and closed (or dropped) when it closes. Closing
/// cancels outstanding remote checks and freezes the displayed feedback.
///
/// Every transition names the generation it belongs to and is applied only if
/// that generation is still the field's latest, so a slow response can never
/// overwrite the outcome of a newer pass.
#[derive(Debug)]
pub struct ValidationSession {
  id: String,
  state: watch::Sender<SessionState>,
  cancel: CancellationToken,
}

impl Default for ValidationSession {
  fn default() -> Self {
    Self::new()
  }
}

impl ValidationSession {
  pub fn new() -> Self {
    let (state, _) = watch::channel(SessionState::default());
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      state,
      cancel: CancellationToken::new(),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// Start a new validation pass for a field: clear its feedback and return
  /// the generation later transitions must carry.
  pub fn begin(&self, field: &str) -> Generation {
    let mut generation = 0;
    self.state.send_modify(|s| {
      let feedback = s.fields.entry(field.to_string()).or_default();
      feedback.generation += 1;
      feedback.state = ValidationState::Idle;
      generation = feedback.generation;
    });
    debug!(session_id = %self.id, field, generation, "validation reset");
    generation
  }

  /// Show a violation.
  pub fn add_error(&self, field: &str, generation: Generation, violation: Violation) -> bool {
    self.transition(field, generation, ValidationState::Rejected { violation })
  }

  /// Show the in-flight indicator with a message.
  pub fn add_message(
    &self,
    field: &str,
    generation: Generation,
    identifier: &str,
    message: &str,
  ) -> bool {
    self.transition(
      field,
      generation,
      ValidationState::Pending {
        identifier: identifier.to_string(),
        message: message.to_string(),
      },
    )
  }

  /// Show success and clear the in-flight indicator.
  pub fn add_success(&self, field: &str, generation: Generation, identifier: &str) -> bool {
    self.transition(
      field,
      generation,
      ValidationState::Accepted {
        identifier: identifier.to_string(),
      },
    )
  }

  /// Show that the check could not be completed.
  pub fn fail(&self, field: &str, generation: Generation, identifier: &str, reason: &str) -> bool {
    self.transition(
      field,
      generation,
      ValidationState::Unavailable {
        identifier: identifier.to_string(),
        reason: reason.to_string(),
      },
    )
  }

  /// Apply a state if `generation` is still the latest for the field.
  pub fn transition(&self, field: &str, generation: Generation, next: ValidationState) -> bool {
    if self.cancel.is_cancelled() {
      return false;
    }
    let applied = self.state.send_if_modified(|s| match s.fields.get_mut(field) {
      Some(feedback) if feedback.generation == generation => {
        feedback.state = next;
        true
      }
      _ => false,
    });
    if !applied {
      debug!(session_id = %self.id, field, generation, "stale transition discarded");
    }
    applied
  }

  pub fn state(&self, field: &str) -> ValidationState {
    self.state.borrow().state(field)
  }

  pub fn generation(&self, field: &str) -> Generation {
    self
      .state
      .borrow()
      .feedback(field)
      .map(|f| f.generation)
      .unwrap_or_default()
  }

  /// Observe feedback changes.
  pub fn subscribe(&self) -> watch::Receiver<SessionState> {
    self.state.subscribe()
  }

  /// Wait until the field is no longer pending and return its state.
  pub async fn settled(&self, field: &str) -> ValidationState {
    let mut rx = self.subscribe();
    let cancel = self.cancel.clone();
    tokio::select! {
      result = rx.wait_for(|s| !s.state(field).is_pending()) => match result {
        Ok(state) => state.state(field),
        Err(_) => self.state(field),
      },
      _ = cancel.cancelled() => self.state(field),
    }
  }

  /// Token cancelled when the session closes.
  pub fn cancellation(&self) -> CancellationToken {
    self.cancel.clone()
  }

  pub fn close(&self) {
    if !self.cancel.is_cancelled() {
      debug!(session_id = %self.id, "validation session closed");
      self.cancel.cancel();
    }
  }

  pub fn is_closed(&self) -> bool {
    self.cancel.is_cancelled()
  }
}

impl Drop for ValidationSession {
  fn drop(&mut self) {
    self.cancel.cancel();
  }
}
