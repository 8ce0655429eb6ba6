//! Integration test utilities for the board server
//!
//! Helpers for running end-to-end tests against the GraphQL endpoint over
//! HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
