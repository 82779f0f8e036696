//! Typed access to an application's hosted web configuration on a remote
//! identity service: the web config itself, its nested feature sub-configs
//! and the owning application, tenant and signing key.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infra;

#[cfg(test)]
pub mod test_utils;

// Re-exports for shorter use statements.
pub use application::*;
pub use domain::*;
