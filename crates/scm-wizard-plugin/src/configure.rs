use std::sync::Arc;

use scm_wizard_config::{SubscriptionModel, WizardSettings, ids};
use scm_wizard_http::ScmClient;
use scm_wizard_registry::Configuration;
use scm_wizard_validation::{CheckScope, UniquenessValidator, ValidationSession};
use tracing::info;

use crate::groups::register_multi_select;
use crate::repository::{PkeyRenderer, register_repository_provider};

/// What the plug-in needs from the host besides the configuration itself.
#[derive(Clone)]
pub struct PluginContext {
  pub model: SubscriptionModel,
  pub settings: WizardSettings,
  pub client: Arc<dyn ScmClient>,
  /// Feedback session of the form being configured.
  pub session: Arc<ValidationSession>,
}

/// Configure the SCM parameters of a subscription form.
///
/// Returns the live repository validator, registered for both the
/// organizational unit and the project, so the host can offer a retry and
/// gate submission on its outcome.
pub fn configure_subscription_parameters(
  config: &mut Configuration,
  ctx: &PluginContext,
) -> Arc<UniquenessValidator> {
  let scope = CheckScope {
    service_type: config.form.service_type.clone(),
    node: config.form.node.clone(),
    pkey: ctx.model.pkey.clone(),
  };
  let validator = Arc::new(UniquenessValidator::new(
    ctx.client.clone(),
    ctx.session.clone(),
    scope,
    &ctx.settings,
  ));

  register_ou(config, ids::OU, validator.clone());
  register_project(config, ids::PROJECT, validator.clone());
  register_repository_provider(config, ids::REPOSITORY);
  register_multi_select(config, ids::LDAP_GROUPS, &ctx.model, &ctx.settings.messages);

  info!(
    session_id = %ctx.session.id(),
    mode = ?config.form.mode,
    service_type = %config.form.service_type,
    node = %config.form.node,
    "subscription parameters configured"
  );
  validator
}

/// The organizational unit triggers repository validation and is pre-filled
/// with the package key.
pub fn register_ou(config: &mut Configuration, id: &str, validator: Arc<UniquenessValidator>) {
  config.registry.set_validator(id, validator);
  config.registry.set_renderer(id, Arc::new(PkeyRenderer));
}

/// The project triggers repository validation.
pub fn register_project(config: &mut Configuration, id: &str, validator: Arc<UniquenessValidator>) {
  config.registry.set_validator(id, validator);
}
