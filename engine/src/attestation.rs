//! Attestation binder.
//!
//! Binds a certificate's public key into an attestation request. The nonce is
//! the SHA-256 of the certificate's DER SubjectPublicKeyInfo, so a relying
//! party holding only the certificate can recompute it with
//! [`attestation_nonce`] and match it against the attestation document.

use enclave_cert_core::attest::Attester;
use enclave_cert_core::error::{CertError, Result};
use sha2::{Digest, Sha256};

use crate::certificate::Certificate;

/// Length of the nonce derived from a public key.
pub const NONCE_LEN: usize = 32;

/// Derive the attestation nonce for a DER SubjectPublicKeyInfo.
pub fn attestation_nonce(public_key_info: &[u8]) -> [u8; NONCE_LEN] {
    Sha256::digest(public_key_info).into()
}

/// The three byte strings sent to the attester for one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRequest<'a> {
    pub nonce: [u8; NONCE_LEN],
    pub public_key: &'a [u8],
    pub user_data: &'a [u8],
}

impl<'a> AttestationRequest<'a> {
    pub fn for_certificate(cert: &'a Certificate, user_data: &'a [u8]) -> Result<Self> {
        let public_key = cert.public_key_info();
        if public_key.is_empty() {
            return Err(CertError::Parse(
                "Certificate carries no subject public key".to_string(),
            ));
        }
        Ok(Self {
            nonce: attestation_nonce(public_key),
            public_key,
            user_data,
        })
    }
}

/// Opaque signed document returned by an attester.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttestationDocument(Vec<u8>);

impl AttestationDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for AttestationDocument {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Certificate {
    /// Request an attestation document binding this certificate's public key.
    ///
    /// The attester is called exactly once. Its error is returned inside
    /// [`CertError::Attestation`] with the original variant intact.
    pub fn attest<A: Attester + ?Sized>(
        &self,
        attester: &A,
        user_data: &[u8],
    ) -> Result<AttestationDocument> {
        let request = AttestationRequest::for_certificate(self, user_data)?;

        let document = attester
            .attest(&request.nonce, request.public_key, request.user_data)
            .map_err(|e| {
                tracing::warn!(error = %e, "Attester failed");
                CertError::Attestation(e)
            })?;

        tracing::info!(
            serial = %self.info().serial_hex(),
            nonce = %hex::encode(request.nonce),
            document_size = document.len(),
            "Attestation document received"
        );

        Ok(AttestationDocument(document))
    }
}

/// Free-function form of [`Certificate::attest`].
pub fn attest_certificate<A: Attester + ?Sized>(
    cert: &Certificate,
    attester: &A,
    user_data: &[u8],
) -> Result<AttestationDocument> {
    cert.attest(attester, user_data)
}
