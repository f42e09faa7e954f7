//! Shared fixtures for validation tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scm_wizard_config::{
  FormConfig, FormMode, Messages, ParameterDef, RetryBackoff, RetryPolicy, SubscriptionModel,
  WizardSettings, ids,
};
use scm_wizard_http::{ClientError, NamedItem, ScmClient};
use scm_wizard_registry::{Form, ParameterRegistry, ProviderContext};
use scm_wizard_validation::{CheckScope, UniquenessValidator, ValidationSession};
use tokio::sync::oneshot;

pub const NODE: &str = "service:scm:git:dev";

/// Client whose existence answers are released by the test.
#[derive(Default)]
pub struct GatedClient {
  calls: Mutex<Vec<String>>,
  gates: Mutex<HashMap<String, oneshot::Receiver<Result<bool, ClientError>>>>,
}

impl GatedClient {
  /// Hold the answer for `identifier` until the returned sender fires.
  pub fn gate(&self, identifier: &str) -> oneshot::Sender<Result<bool, ClientError>> {
    let (tx, rx) = oneshot::channel();
    self
      .gates
      .lock()
      .unwrap()
      .insert(identifier.to_string(), rx);
    tx
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl ScmClient for GatedClient {
  async fn exists(
    &self,
    _service_type: &str,
    _node: &str,
    identifier: &str,
  ) -> Result<bool, ClientError> {
    self.calls.lock().unwrap().push(identifier.to_string());
    let gate = self.gates.lock().unwrap().remove(identifier);
    match gate {
      Some(rx) => rx
        .await
        .unwrap_or_else(|_| Err(ClientError::unavailable("gate dropped"))),
      None => Ok(false),
    }
  }

  async fn search_repositories(
    &self,
    _service_type: &str,
    _node: &str,
    _criteria: &str,
  ) -> Result<Vec<NamedItem>, ClientError> {
    Ok(Vec::new())
  }

  async fn search_groups(
    &self,
    _model_id: u32,
    _node: &str,
    _term: &str,
  ) -> Result<Vec<NamedItem>, ClientError> {
    Ok(Vec::new())
  }
}

pub fn settings(max_retry_attempts: u32) -> WizardSettings {
  WizardSettings {
    retry: RetryPolicy {
      max_retry_attempts,
      backoff: RetryBackoff::Constant,
      delay_ms: 1,
    },
    ..WizardSettings::default()
  }
}

/// A create-mode form with the OU, project and repository fields.
pub fn create_form(pkey: &str) -> Form {
  render_form(pkey, &[ids::OU, ids::PROJECT, ids::REPOSITORY])
}

/// A create-mode form with exactly the given fields.
pub fn render_form(pkey: &str, fields: &[&str]) -> Form {
  let ctx = ProviderContext {
    form: FormConfig::new(FormMode::Create, "git", NODE),
    model: SubscriptionModel {
      id: 1,
      pkey: pkey.to_string(),
    },
    messages: Messages::default(),
  };
  let parameters: Vec<ParameterDef> = fields.iter().map(|id| ParameterDef::new(*id)).collect();
  Form::render(&ParameterRegistry::new(), &parameters, &ctx)
}

pub fn validator(
  client: Arc<dyn ScmClient>,
  pkey: &str,
  settings: &WizardSettings,
) -> (UniquenessValidator, Arc<ValidationSession>) {
  let session = Arc::new(ValidationSession::new());
  let scope = CheckScope {
    service_type: "git".to_string(),
    node: NODE.to_string(),
    pkey: pkey.to_string(),
  };
  (
    UniquenessValidator::new(client, session.clone(), scope, settings),
    session,
  )
}
