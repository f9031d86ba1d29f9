//! # API Harness Library
//!
//! Environment-aware configuration, token lifecycle and request composition
//! for automated API test suites.
//!
//! Modules:
//! - `config` — harness file, environment resolution and validation
//! - `cache` — token cache with expiry and the token manager
//! - `sources` — bearer, OAuth2 and per-token-type credential flows
//! - `request` — service routing and request composition
//! - `transport` — HTTP execution with timeout and retries
//! - `validation` — JSON schema validation and response assertions

pub mod cache;
pub mod config;
pub mod errors;
pub mod harness;
pub mod helpers;
pub mod observability;
pub mod request;
pub mod resilience;
pub mod sources;
pub mod transport;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod tests;

pub use crate::config::settings::HarnessConfig;
pub use crate::errors::HarnessError;
pub use crate::harness::Harness;
