//! Enclave Cert - attested ephemeral TLS certificates.
//!
//! Issues self-signed P-384 certificates whose public key can be bound into a
//! TEE attestation document, so a relying party can check that the TLS
//! session key was generated inside a trusted execution context.
//!
//! ```ignore
//! // Inside the enclave:
//! let cert = enclave_cert::make_certificate("Example Org", "enclave.example.com")?;
//! let attester = enclave_cert::select_attester(nsm_attester);
//! let document = cert.attest(&attester, b"session")?;
//! let server_config = cert.to_tls_pair()?.server_config()?;
//!
//! // Relying party, holding the served certificate:
//! let nonce = enclave_cert::attestation_nonce(cert.public_key_info());
//! ```

pub mod attestation;
pub mod certificate;
pub mod converter;
pub mod der_bytes;
pub mod factory;
pub mod key;
pub mod simulate;
pub mod tls;

// Re-export common types
pub use attestation::{
    attest_certificate, attestation_nonce, AttestationDocument, AttestationRequest, NONCE_LEN,
};
pub use certificate::Certificate;
pub use converter::{verify_self_signed, CertificateInfo, DerConverter, X509Converter};
pub use der_bytes::DerBytes;
pub use factory::{make_certificate, CertificateFactory};
pub use key::PrivateKey;
pub use simulate::{
    parse_simulated_document, select_attester, select_attester_with, SelectedAttester,
    SimulatedAttester, SimulatedDocument,
};
pub use tls::TlsPair;

pub use enclave_cert_core::{
    Attester, AttesterError, CertError, IdentityField, IssuanceConfig, Result, ValidationError,
    ValidationOutcome, Validator,
};

/// Enclave Cert version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
