use crate::state::Violation;

/// Compute the repository identifier from the organizational unit and the
/// project. Empty values are treated as absent. The result is always lowercase.
pub fn derive_identifier(ou: &str, project: &str) -> String {
  match (ou.is_empty(), project.is_empty()) {
    (false, false) => format!("{}-{}", ou, project).to_lowercase(),
    (false, true) => ou.to_lowercase(),
    (true, false) => project.to_lowercase(),
    (true, true) => String::new(),
  }
}

/// The identifier must be the package key itself or start with `<pkey>-`.
pub fn check_naming_convention(identifier: &str, pkey: &str) -> Result<(), Violation> {
  let valid = identifier == pkey
    || identifier
      .strip_prefix(pkey)
      .is_some_and(|rest| rest.starts_with('-'));
  if valid {
    Ok(())
  } else {
    Err(Violation::starts_with(pkey))
  }
}
