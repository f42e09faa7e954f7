//! Repository identifier field: computed in create mode, linked otherwise.

use std::sync::Arc;

use scm_wizard_config::{FormConfig, ParameterDef};
use scm_wizard_http::{ClientError, NamedItem, ScmClient};
use scm_wizard_registry::{
  Configuration, Control, FieldHandle, Provider, ProviderContext, Renderer, SelectBinding,
};
use tracing::debug;

/// Wraps a provider to render a computed field: the description is dropped,
/// since the field's meaning is overridden, and the input is read-only.
pub struct ComputedProvider {
  inner: Arc<dyn Provider>,
}

impl ComputedProvider {
  pub fn new(inner: Arc<dyn Provider>) -> Self {
    Self { inner }
  }
}

impl Provider for ComputedProvider {
  fn provide(&self, parameter: &ParameterDef, ctx: &ProviderContext) -> FieldHandle {
    let stripped = ParameterDef {
      description: None,
      ..parameter.clone()
    };
    let mut field = self.inner.provide(&stripped, ctx);
    field.readonly = true;
    field
  }
}

/// Binds a field to a remote search endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSelectProvider {
  binding: SelectBinding,
}

impl RemoteSelectProvider {
  pub fn new(binding: SelectBinding) -> Self {
    Self { binding }
  }

  /// Select of existing repositories of the form's tool and node.
  pub fn repositories(form: &FormConfig) -> Self {
    Self::new(SelectBinding {
      endpoint: format!("service/scm/{}/", form.service_type),
      node: form.node.clone(),
      link: true,
    })
  }
}

impl Provider for RemoteSelectProvider {
  fn provide(&self, parameter: &ParameterDef, _ctx: &ProviderContext) -> FieldHandle {
    FieldHandle {
      id: parameter.id.clone(),
      value: String::new(),
      readonly: false,
      description: parameter.description.clone(),
      control: Control::RemoteSelect(self.binding.clone()),
    }
  }
}

/// Pre-fills the field with the package key and locks it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PkeyRenderer;

impl Renderer for PkeyRenderer {
  fn render(&self, _parameter: &ParameterDef, field: &mut FieldHandle, ctx: &ProviderContext) {
    field.value = ctx.model.pkey.clone();
    field.readonly = true;
  }
}

/// Register the repository identifier provider for the configuration's mode.
///
/// In create mode the previously registered provider (or the standard one)
/// is wrapped by [`ComputedProvider`] and the field is pre-filled with the
/// package key. In any other mode the field becomes a link-mode remote select
/// of existing repositories, and renderers are left untouched.
pub fn register_repository_provider(config: &mut Configuration, id: &str) {
  if config.form.mode.is_create() {
    let previous = config.registry.provider_or_standard(id);
    config
      .registry
      .set_provider(id, Arc::new(ComputedProvider::new(previous)));
    config.registry.set_renderer(id, Arc::new(PkeyRenderer));
    debug!(parameter = id, "repository identifier is computed");
  } else {
    config
      .registry
      .set_provider(id, Arc::new(RemoteSelectProvider::repositories(&config.form)));
    debug!(
      parameter = id,
      service_type = %config.form.service_type,
      node = %config.form.node,
      "repository identifier is linked"
    );
  }
}

/// Search existing repositories for a link-mode select.
pub async fn search_repositories(
  client: &dyn ScmClient,
  form: &FormConfig,
  criteria: &str,
) -> Result<Vec<NamedItem>, ClientError> {
  client
    .search_repositories(&form.service_type, &form.node, criteria)
    .await
}
