use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use scm_wizard_config::{FormConfig, Messages, ParameterDef, SubscriptionModel};

use crate::field::FieldHandle;
use crate::form::Form;

/// Everything a provider or renderer may read while producing a field.
#[derive(Debug, Clone)]
pub struct ProviderContext {
  pub form: FormConfig,
  pub model: SubscriptionModel,
  pub messages: Messages,
}

/// Strategy rendering the input control of a parameter.
pub trait Provider: Send + Sync {
  fn provide(&self, parameter: &ParameterDef, ctx: &ProviderContext) -> FieldHandle;
}

impl<F> Provider for F
where
  F: Fn(&ParameterDef, &ProviderContext) -> FieldHandle + Send + Sync,
{
  fn provide(&self, parameter: &ParameterDef, ctx: &ProviderContext) -> FieldHandle {
    self(parameter, ctx)
  }
}

/// Strategy applied after a provider to adjust the produced field.
///
/// Renderers may run more than once for the same field and must be idempotent.
pub trait Renderer: Send + Sync {
  fn render(&self, parameter: &ParameterDef, field: &mut FieldHandle, ctx: &ProviderContext);
}

impl<F> Renderer for F
where
  F: Fn(&ParameterDef, &mut FieldHandle, &ProviderContext) + Send + Sync,
{
  fn render(&self, parameter: &ParameterDef, field: &mut FieldHandle, ctx: &ProviderContext) {
    self(parameter, field, ctx)
  }
}

/// Strategy invoked whenever a parameter changes.
///
/// The returned flag is the immediate verdict only: `true` lets the form
/// progress tentatively while asynchronous checks are still running.
pub trait Validator: Send + Sync {
  fn validate(&self, form: &mut Form) -> bool;
}

/// Default provider: an editable text input carrying the parameter description.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardProvider;

impl Provider for StandardProvider {
  fn provide(&self, parameter: &ParameterDef, _ctx: &ProviderContext) -> FieldHandle {
    FieldHandle::text(&parameter.id, parameter.description.clone())
  }
}

/// Providers, validators and renderers keyed by parameter id.
#[derive(Clone, Default)]
pub struct ParameterRegistry {
  providers: HashMap<String, Arc<dyn Provider>>,
  validators: HashMap<String, Arc<dyn Validator>>,
  renderers: HashMap<String, Arc<dyn Renderer>>,
}

impl ParameterRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a provider, replacing any previous one for this id.
  pub fn set_provider(&mut self, id: impl Into<String>, provider: Arc<dyn Provider>) {
    self.providers.insert(id.into(), provider);
  }

  pub fn set_validator(&mut self, id: impl Into<String>, validator: Arc<dyn Validator>) {
    self.validators.insert(id.into(), validator);
  }

  pub fn set_renderer(&mut self, id: impl Into<String>, renderer: Arc<dyn Renderer>) {
    self.renderers.insert(id.into(), renderer);
  }

  pub fn provider(&self, id: &str) -> Option<&Arc<dyn Provider>> {
    self.providers.get(id)
  }

  /// The registered provider, or [`StandardProvider`] when none is registered.
  pub fn provider_or_standard(&self, id: &str) -> Arc<dyn Provider> {
    self
      .providers
      .get(id)
      .cloned()
      .unwrap_or_else(|| Arc::new(StandardProvider))
  }

  pub fn validator(&self, id: &str) -> Option<&Arc<dyn Validator>> {
    self.validators.get(id)
  }

  pub fn renderer(&self, id: &str) -> Option<&Arc<dyn Renderer>> {
    self.renderers.get(id)
  }
}

impl fmt::Debug for ParameterRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut providers: Vec<_> = self.providers.keys().collect();
    let mut validators: Vec<_> = self.validators.keys().collect();
    let mut renderers: Vec<_> = self.renderers.keys().collect();
    providers.sort();
    validators.sort();
    renderers.sort();
    f.debug_struct("ParameterRegistry")
      .field("providers", &providers)
      .field("validators", &validators)
      .field("renderers", &renderers)
      .finish()
  }
}

/// Configuration of one subscription form: its scope plus the registry the
/// plug-in specializes during setup.
#[derive(Debug, Clone)]
pub struct Configuration {
  pub form: FormConfig,
  pub registry: ParameterRegistry,
}

impl Configuration {
  pub fn new(form: FormConfig) -> Self {
    Self {
      form,
      registry: ParameterRegistry::new(),
    }
  }
}
