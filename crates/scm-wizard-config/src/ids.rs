//! Parameter identifiers handled by the SCM plug-in.

/// Prefix shared by every SCM parameter.
pub const SERVICE_KEY: &str = "service:scm";

/// Organizational unit the repository belongs to.
pub const OU: &str = "service:scm:ou";

/// Project name, second half of the computed repository identifier.
pub const PROJECT: &str = "service:scm:project";

/// Computed (create mode) or linked (other modes) repository identifier.
pub const REPOSITORY: &str = "service:scm:repository";

/// Groups granted access to the repository.
pub const LDAP_GROUPS: &str = "service:scm:ldapgroups";

/// Build a tool-specific parameter id, e.g. `service:scm:git:url`.
pub fn typed(service_type: &str, suffix: &str) -> String {
  format!("{}:{}:{}", SERVICE_KEY, service_type, suffix)
}
