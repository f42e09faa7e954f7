//! scm-wizard Config
//!
//! This crate contains the serializable configuration types for the SCM
//! subscription wizard. These types describe a form before it is rendered
//! and validated by the registry and validation crates.
//!
//! Configuration can be loaded from:
//! - JSON settings files (via CLI with `--settings=settings.json`)
//! - The host wizard, which supplies the form scope and subscription model
//!
//! The plug-in takes these types, registers parameter behavior against them,
//! and drives live validation of the computed repository identifier.

mod form;
pub mod ids;
mod parameter;
mod settings;

pub use form::{FormConfig, FormMode, SubscriptionModel};
pub use parameter::ParameterDef;
pub use settings::{Messages, RetryBackoff, RetryPolicy, WizardSettings};
