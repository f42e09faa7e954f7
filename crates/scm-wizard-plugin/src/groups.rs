//! Group membership multi-select.

use std::sync::Arc;

use scm_wizard_config::{Messages, ParameterDef, SubscriptionModel};
use scm_wizard_http::{ClientError, NamedItem, ScmClient};
use scm_wizard_registry::{
  Configuration, Control, FieldHandle, MultiSelectOptions, ProviderContext, Renderer,
  SelectBinding,
};

use crate::repository::RemoteSelectProvider;

/// Turns a remote select into a multi-select of existing groups only.
#[derive(Debug, Clone)]
pub struct MultiSelectRenderer {
  searching_text: String,
}

impl MultiSelectRenderer {
  pub fn new(messages: &Messages) -> Self {
    Self {
      searching_text: messages.loading.clone(),
    }
  }
}

impl Renderer for MultiSelectRenderer {
  fn render(&self, _parameter: &ParameterDef, field: &mut FieldHandle, _ctx: &ProviderContext) {
    let Some(binding) = field.binding().cloned() else {
      return;
    };
    field.control = Control::MultiSelect(MultiSelectOptions {
      binding,
      multiple: true,
      minimum_input_length: 1,
      display_field: "name".to_string(),
      allow_create: false,
      searching_text: self.searching_text.clone(),
    });
  }
}

/// Register the group multi-select, scoped by the subscription and its node.
pub fn register_multi_select(
  config: &mut Configuration,
  id: &str,
  model: &SubscriptionModel,
  messages: &Messages,
) {
  let binding = SelectBinding {
    endpoint: format!("service/id/ldap/group/subscriptions/{}/", model.id),
    node: config.form.node.clone(),
    link: false,
  };
  config
    .registry
    .set_provider(id, Arc::new(RemoteSelectProvider::new(binding)));
  config
    .registry
    .set_renderer(id, Arc::new(MultiSelectRenderer::new(messages)));
}

/// Search groups for a multi-select. Terms shorter than the minimum input
/// length yield no results and issue no request.
pub async fn search_groups(
  client: &dyn ScmClient,
  model: &SubscriptionModel,
  options: &MultiSelectOptions,
  term: &str,
) -> Result<Vec<NamedItem>, ClientError> {
  if !options.accepts_term(term) {
    return Ok(Vec::new());
  }
  client
    .search_groups(model.id, &options.binding.node, term)
    .await
}

/// Resolve a user choice against the search results. Without free-text
/// creation only an existing result can be selected.
pub fn select_group(options: &MultiSelectOptions, results: &[NamedItem], choice: &str) -> Option<NamedItem> {
  results
    .iter()
    .find(|r| r.id == choice)
    .cloned()
    .or_else(|| options.allow_create.then(|| NamedItem::new(choice, choice)))
}
