//! Opaque DER certificate buffer.

use der::pem::LineEnding;
use enclave_cert_core::error::{CertError, Result};
use sha2::{Digest, Sha256};

/// PEM label for X.509 certificates.
pub const CERTIFICATE_PEM_LABEL: &str = "CERTIFICATE";

/// The DER encoding of a single X.509 certificate.
///
/// Carries no parsed semantics; interpretation belongs to a
/// [`DerConverter`](crate::converter::DerConverter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerBytes(Vec<u8>);

impl DerBytes {
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

    /// Lowercase hex SHA-256 of the DER bytes.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.0))
    }

    /// Encode as a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        der::pem::encode_string(CERTIFICATE_PEM_LABEL, LineEnding::LF, &self.0)
            .map_err(|e| CertError::Encoding(format!("Failed to PEM-encode certificate: {}", e)))
    }

    /// Decode a single `CERTIFICATE` PEM block.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let (label, der) = der::pem::decode_vec(pem.as_bytes())
            .map_err(|e| CertError::Encoding(format!("Failed to decode certificate PEM: {}", e)))?;
        if label != CERTIFICATE_PEM_LABEL {
            return Err(CertError::Encoding(format!(
                "Unexpected PEM label '{}', expected '{}'",
                label, CERTIFICATE_PEM_LABEL
            )));
        }
        Ok(Self(der))
    }
}

impl From<Vec<u8>> for DerBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for DerBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for DerBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_der_bytes_pem_roundtrip() {
        let der = DerBytes::from(vec![0x30, 0x03, 0x02, 0x01, 0x01]);
        let pem = der.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert_eq!(DerBytes::from_pem(&pem).unwrap(), der);
    }

    #[test]
    fn test_der_bytes_from_pem_wrong_label() {
        let pem = der::pem::encode_string("PRIVATE KEY", LineEnding::LF, &[1, 2, 3]).unwrap();
        let err = DerBytes::from_pem(&pem).unwrap_err();
        assert!(err.to_string().contains("Unexpected PEM label"));
    }

    #[test]
    fn test_der_bytes_from_pem_garbage() {
        assert!(matches!(
            DerBytes::from_pem("not a pem block"),
            Err(CertError::Encoding(_))
        ));
    }

    #[test]
    fn test_der_bytes_fingerprint_is_sha256() {
        let der = DerBytes::default();
        assert_eq!(
            der.fingerprint(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(der.is_empty());
    }
}
