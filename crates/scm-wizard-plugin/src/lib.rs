//! scm-wizard Plugin
//!
//! Specializes a subscription form for source-control tools:
//!
//! - the organizational unit is pre-filled with the package key,
//! - changing the organizational unit or the project recomputes the repository
//!   identifier and validates it live ([`configure_subscription_parameters`]),
//! - the repository field is computed and locked in create mode and becomes a
//!   remote select of existing repositories otherwise,
//! - groups are picked from a remote multi-select.
//!
//! [`SubscriptionForm`] drives a configured form the way the host wizard does.

mod configure;
mod features;
mod form;
mod groups;
mod repository;

pub use configure::{
  PluginContext, configure_subscription_parameters, register_ou, register_project,
};
pub use features::FeatureLink;
pub use form::{FormError, SubscriptionForm};
pub use groups::{MultiSelectRenderer, register_multi_select, search_groups, select_group};
pub use repository::{
  ComputedProvider, PkeyRenderer, RemoteSelectProvider, register_repository_provider,
  search_repositories,
};
