//! scm-wizard Validation
//!
//! Live validation of the computed repository identifier:
//!
//! 1. [`derive_identifier`] computes the identifier from the organizational
//!    unit and the project.
//! 2. [`check_naming_convention`] enforces the package-key prefix locally.
//! 3. [`UniquenessValidator`] asks the remote service whether the identifier
//!    is already in use and reports the outcome through a
//!    [`ValidationSession`].
//!
//! Checks may overlap when the user keeps typing. Each one is tagged with the
//! generation it was issued for and its outcome is dropped once a newer
//! generation exists, so the displayed state always belongs to the latest
//! trigger.

mod gate;
mod naming;
mod session;
mod state;
mod uniqueness;

pub use gate::{SubmissionGate, SubmitError};
pub use naming::{check_naming_convention, derive_identifier};
pub use session::{FieldFeedback, Generation, SessionState, ValidationSession};
pub use state::{Rule, ValidationState, Violation};
pub use uniqueness::{CheckOutcome, CheckScope, PendingCheck, Trigger, UniquenessValidator};
