//! scm-wizard HTTP
//!
//! Remote lookups used by the SCM subscription form. [`ScmClient`] is the seam
//! the validators depend on; [`HttpScmClient`] talks to the REST API and
//! [`InMemoryScmClient`] answers from memory.

mod client;
mod error;
mod memory;
mod types;

pub use client::{HttpScmClient, ScmClient};
pub use error::ClientError;
pub use memory::InMemoryScmClient;
pub use types::{NamedItem, decode_exists, decode_results};
