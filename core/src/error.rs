use std::fmt;

use thiserror::Error;

use crate::attest::AttesterError;

/// Identity field of a certificate subject that failed encoding or validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    /// Subject organization (encoded as a UTF8String).
    Organization,
    /// Fully-qualified domain name (encoded as an IA5String dNSName).
    Fqdn,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => write!(f, "organization"),
            Self::Fqdn => write!(f, "fqdn"),
        }
    }
}

/// Enclave certificate error types
#[derive(Error, Debug)]
pub enum CertError {
    /// Organization or FQDN cannot be legally encoded
    #[error("invalid {field} encoding: {reason}")]
    InvalidIdentity { field: IdentityField, reason: String },

    /// An injected validator refused an identity field
    #[error("{field} rejected by validator: {reason}")]
    IdentityRejected { field: IdentityField, reason: String },

    /// An operation needing the private key was called on a public-only certificate
    #[error("private key required but missing")]
    MissingPrivateKey,

    /// Private key material is empty, truncated or not on P-384
    #[error("malformed private key: {0}")]
    MalformedKey(String),

    /// Private key does not belong to the certificate's public key
    #[error("private key does not match certificate public key")]
    KeyMismatch,

    /// The attester capability failed
    #[error("attestation failed: {0}")]
    Attestation(#[from] AttesterError),

    /// DER bytes could not be interpreted as an X.509 certificate
    #[error("certificate parse error: {0}")]
    Parse(String),

    /// Key generation or self-signing failed
    #[error("certificate generation failed: {0}")]
    Generation(String),

    /// PEM/DER re-encoding failed
    #[error("encoding error: {0}")]
    Encoding(String),

    /// rustls rejected the certificate/key pair
    #[error("TLS error: {0}")]
    Tls(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CertError {
    /// Field that caused an identity error, if this is one.
    pub fn identity_field(&self) -> Option<IdentityField> {
        match self {
            Self::InvalidIdentity { field, .. } | Self::IdentityRejected { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

/// Result type alias for enclave certificate operations
pub type Result<T> = std::result::Result<T, CertError>;
