//! Test utilities.
//!
//! This module provides:
//! - Test data factories for creating valid web config fixtures
//! - A client wrapper that counts fetches per href

mod counting_client;
mod factories;

pub use counting_client::*;
pub use factories::*;
