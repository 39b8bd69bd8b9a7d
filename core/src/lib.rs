//! Enclave Cert Core - Foundational Types and Abstractions
//!
//! Error taxonomy, issuance configuration, and the capability traits
//! (attester, identity validator) consumed by the certificate engine.

pub mod attest;
pub mod config;
pub mod error;
pub mod validate;

// Re-export commonly used types
pub use attest::{Attester, AttesterError};
pub use config::{is_simulate_mode, simulate_flag, IssuanceConfig, MAX_VALIDITY_DAYS, SIMULATE_ENV};
pub use error::{CertError, IdentityField, Result};
pub use validate::{ValidationError, ValidationOutcome, Validator};

/// Enclave Cert version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
