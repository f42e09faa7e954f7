//! A rendered subscription form.

use std::collections::{BTreeMap, HashMap};

use scm_wizard_config::ParameterDef;
use tracing::debug;

use crate::error::RegistryError;
use crate::field::FieldHandle;
use crate::registry::{ParameterRegistry, ProviderContext};

/// Rendered fields of one form instance, keyed by parameter id.
#[derive(Debug, Clone, Default)]
pub struct Form {
  fields: BTreeMap<String, FieldHandle>,
}

impl Form {
  /// Render every parameter: its provider first, then its renderer if any.
  pub fn render(
    registry: &ParameterRegistry,
    parameters: &[ParameterDef],
    ctx: &ProviderContext,
  ) -> Self {
    let mut fields = BTreeMap::new();
    for parameter in parameters {
      let mut field = registry
        .provider_or_standard(&parameter.id)
        .provide(parameter, ctx);
      if let Some(renderer) = registry.renderer(&parameter.id) {
        renderer.render(parameter, &mut field, ctx);
      }
      debug!(parameter = %parameter.id, readonly = field.readonly, "parameter rendered");
      fields.insert(parameter.id.clone(), field);
    }
    Self { fields }
  }

  pub fn field(&self, id: &str) -> Option<&FieldHandle> {
    self.fields.get(id)
  }

  pub fn field_mut(&mut self, id: &str) -> Option<&mut FieldHandle> {
    self.fields.get_mut(id)
  }

  pub fn fields(&self) -> impl Iterator<Item = &FieldHandle> {
    self.fields.values()
  }

  /// Current value of a field; `None` when the field is absent or empty.
  pub fn value(&self, id: &str) -> Option<&str> {
    self
      .fields
      .get(id)
      .map(|f| f.value.as_str())
      .filter(|v| !v.is_empty())
  }

  /// User edit. Read-only fields cannot be edited.
  pub fn edit(&mut self, id: &str, value: impl Into<String>) -> Result<(), RegistryError> {
    let field = self
      .fields
      .get_mut(id)
      .ok_or_else(|| RegistryError::UnknownParameter { id: id.to_string() })?;
    if field.readonly {
      return Err(RegistryError::ReadOnly { id: id.to_string() });
    }
    field.value = value.into();
    Ok(())
  }

  /// Programmatic write, used for computed fields. Returns false when the
  /// field is not part of this form.
  pub fn set_value(&mut self, id: &str, value: impl Into<String>, readonly: bool) -> bool {
    match self.fields.get_mut(id) {
      Some(field) => {
        field.value = value.into();
        field.readonly = readonly;
        true
      }
      None => false,
    }
  }

  /// Read-only copy of the current values.
  pub fn snapshot(&self) -> HashMap<String, String> {
    self
      .fields
      .iter()
      .map(|(id, f)| (id.clone(), f.value.clone()))
      .collect()
  }
}
