//! scm-wizard Registry
//!
//! Holds the per-form strategies the host wizard consults for each parameter:
//! a [`Provider`] renders the field, an optional [`Renderer`] adjusts it
//! afterwards, and an optional [`Validator`] runs whenever the field changes.
//!
//! Later registrations replace earlier ones. Overrides that need the previous
//! behavior wrap it explicitly instead of patching it in place.

mod error;
mod field;
mod form;
mod registry;

pub use error::RegistryError;
pub use field::{Control, FieldHandle, MultiSelectOptions, SelectBinding};
pub use form::Form;
pub use registry::{
  Configuration, ParameterRegistry, Provider, ProviderContext, Renderer, StandardProvider,
  Validator,
};
