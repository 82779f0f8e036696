//! In-process implementation of the identity service.

pub mod dns_label;
mod identity_service;

pub use identity_service::InMemoryIdentityService;
