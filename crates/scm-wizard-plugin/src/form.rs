//! A configured subscription form, driven the way the host wizard drives it.

use std::collections::HashMap;
use std::sync::Arc;

use scm_wizard_config::{FormConfig, ParameterDef, SubscriptionModel, WizardSettings, ids};
use scm_wizard_http::ScmClient;
use scm_wizard_registry::{Configuration, Form, ProviderContext, RegistryError, Validator};
use scm_wizard_validation::{
  SubmissionGate, SubmitError, Trigger, UniquenessValidator, ValidationSession, ValidationState,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::configure::{PluginContext, configure_subscription_parameters};

#[derive(Debug, Error)]
pub enum FormError {
  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error("submission refused: {0}")]
  Submit(#[from] SubmitError),
}

/// One open subscription form.
pub struct SubscriptionForm {
  configuration: Configuration,
  form: Form,
  session: Arc<ValidationSession>,
  validator: Arc<UniquenessValidator>,
  gate: SubmissionGate,
}

impl SubscriptionForm {
  /// Configure the registry, render every parameter and open a validation
  /// session for the form.
  pub fn open(
    form_config: FormConfig,
    model: SubscriptionModel,
    parameters: &[ParameterDef],
    client: Arc<dyn ScmClient>,
    settings: &WizardSettings,
  ) -> Self {
    let session = Arc::new(ValidationSession::new());
    let mut configuration = Configuration::new(form_config.clone());
    let ctx = PluginContext {
      model: model.clone(),
      settings: settings.clone(),
      client,
      session: session.clone(),
    };
    let validator = configure_subscription_parameters(&mut configuration, &ctx);

    let provider_ctx = ProviderContext {
      form: form_config.clone(),
      model,
      messages: settings.messages.clone(),
    };
    let form = Form::render(&configuration.registry, parameters, &provider_ctx);
    let gate = SubmissionGate::new(form_config.mode, parameters);

    info!(session_id = %session.id(), parameters = parameters.len(), "subscription form opened");
    Self {
      configuration,
      form,
      session,
      validator,
      gate,
    }
  }

  pub fn configuration(&self) -> &Configuration {
    &self.configuration
  }

  pub fn form(&self) -> &Form {
    &self.form
  }

  pub fn session(&self) -> &Arc<ValidationSession> {
    &self.session
  }

  /// Apply a user edit and run the field's validator, if any.
  ///
  /// Returns the immediate verdict; asynchronous outcomes show up in
  /// [`Self::repository_state`].
  pub fn change(&mut self, id: &str, value: &str) -> Result<bool, FormError> {
    self.form.edit(id, value)?;
    let verdict = match self.configuration.registry.validator(id).cloned() {
      Some(validator) => validator.validate(&mut self.form),
      None => true,
    };
    debug!(parameter = id, verdict, "parameter changed");
    Ok(verdict)
  }

  /// Re-issue the repository check after it could not be completed.
  pub fn retry(&mut self) -> Option<Trigger> {
    self.validator.retry(&mut self.form)
  }

  pub fn repository_state(&self) -> ValidationState {
    self.session.state(ids::REPOSITORY)
  }

  /// Wait for the outstanding repository check, if any.
  pub async fn settled(&self) -> ValidationState {
    self.session.settled(ids::REPOSITORY).await
  }

  /// The parameters to submit, once the form may be submitted.
  pub fn submit(&self) -> Result<HashMap<String, String>, FormError> {
    self.gate.check(&self.form, &self.session)?;
    Ok(self.form.snapshot())
  }

  /// Close the form: outstanding checks are cancelled. Dropping the form
  /// has the same effect.
  pub fn close(self) {}
}

impl Drop for SubscriptionForm {
  fn drop(&mut self) {
    self.session.close();
  }
}
