//! Attester capability.
//!
//! The attester is the trust root of attested TLS: given a nonce, a public
//! key and caller data, it returns a document signed by hardware or firmware
//! (an AWS Nitro NSM device, an SEV-SNP guest device, ...). The engine treats
//! the document as opaque bytes.

use thiserror::Error;

/// Failure reported by an [`Attester`] implementation.
///
/// Variants let callers tell a device that cannot be reached apart from one
/// that refused the request. The engine never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttesterError {
    /// The attestation device is missing or busy in this execution context.
    #[error("attestation device unavailable: {0}")]
    Unavailable(String),

    /// The device processed the request and refused it.
    #[error("attestation request rejected: {0}")]
    Rejected(String),

    /// The caller-imposed deadline expired before the device answered.
    #[error("attestation timed out: {0}")]
    TimedOut(String),

    /// The caller cancelled the request.
    #[error("attestation cancelled")]
    Cancelled,

    /// Any other device failure.
    #[error("{0}")]
    Other(String),
}

/// Produces a signed attestation document binding a nonce, a public key and
/// caller-supplied data.
///
/// Calls may block on a hardware round-trip. Implementations own their retry
/// and timeout policy.
pub trait Attester: Send + Sync {
    fn attest(
        &self,
        nonce: &[u8],
        public_key: &[u8],
        user_data: &[u8],
    ) -> std::result::Result<Vec<u8>, AttesterError>;
}

impl<T: Attester + ?Sized> Attester for &T {
    fn attest(
        &self,
        nonce: &[u8],
        public_key: &[u8],
        user_data: &[u8],
    ) -> std::result::Result<Vec<u8>, AttesterError> {
        (**self).attest(nonce, public_key, user_data)
    }
}

impl<T: Attester + ?Sized> Attester for std::sync::Arc<T> {
    fn attest(
        &self,
        nonce: &[u8],
        public_key: &[u8],
        user_data: &[u8],
    ) -> std::result::Result<Vec<u8>, AttesterError> {
        (**self).attest(nonce, public_key, user_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EchoAttester;

    impl Attester for EchoAttester {
        fn attest(
            &self,
            nonce: &[u8],
            public_key: &[u8],
            user_data: &[u8],
        ) -> std::result::Result<Vec<u8>, AttesterError> {
            Ok([nonce, public_key, user_data].concat())
        }
    }

    #[test]
    fn test_attester_through_arc() {
        let attester: Arc<dyn Attester> = Arc::new(EchoAttester);
        let doc = attester.attest(b"n", b"pk", b"ud").unwrap();
        assert_eq!(doc, b"npkud");
    }

    #[test]
    fn test_attester_error_display() {
        assert_eq!(
            AttesterError::Unavailable("nsm not found".to_string()).to_string(),
            "attestation device unavailable: nsm not found"
        );
        assert_eq!(AttesterError::Cancelled.to_string(), "attestation cancelled");
    }
}
