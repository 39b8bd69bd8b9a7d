//! The certificate entity: DER bytes plus an optionally owned private key.
//!
//! A [`Certificate`] is built once, by the factory or by raw import, and is
//! immutable afterwards. When a private key is present its public half is
//! expected to match the public key inside the DER bytes. The factory and
//! [`Certificate::from_raw`] check this; [`Certificate::from_raw_unchecked`]
//! leaves it to the caller, and TLS assembly fails on a mismatch.

use enclave_cert_core::error::{CertError, Result};

use crate::converter::{CertificateInfo, DerConverter};
use crate::der_bytes::DerBytes;
use crate::key::PrivateKey;

#[derive(Debug, Default)]
pub struct Certificate {
    der: DerBytes,
    info: CertificateInfo,
    private_key: Option<PrivateKey>,
}

impl Certificate {
    /// Reconstruct a certificate from previously produced DER bytes.
    ///
    /// Parsing is delegated to `converter`. A missing key yields a
    /// public-only certificate. The key is NOT checked against the
    /// certificate's public key.
    pub fn from_raw_unchecked<C: DerConverter + ?Sized>(
        der: DerBytes,
        converter: &C,
        private_key: Option<PrivateKey>,
    ) -> Result<Self> {
        let info = converter.parse(&der)?;
        tracing::debug!(
            der_size = der.len(),
            serial = %info.serial_hex(),
            has_private_key = private_key.is_some(),
            "Imported raw certificate"
        );
        Ok(Self {
            der,
            info,
            private_key,
        })
    }

    /// Reconstruct a certificate and verify the key belongs to it.
    ///
    /// Fails with [`CertError::MalformedKey`] if the key is not a usable
    /// P-384 key, and [`CertError::KeyMismatch`] if its public half differs
    /// from the certificate's subject public key.
    pub fn from_raw<C: DerConverter + ?Sized>(
        der: DerBytes,
        converter: &C,
        private_key: Option<PrivateKey>,
    ) -> Result<Self> {
        let cert = Self::from_raw_unchecked(der, converter, private_key)?;
        if let Some(key) = &cert.private_key {
            if key.public_key_sec1()? != cert.info.public_key {
                return Err(CertError::KeyMismatch);
            }
        }
        Ok(cert)
    }

    pub fn der_bytes(&self) -> &DerBytes {
        &self.der
    }

    pub fn info(&self) -> &CertificateInfo {
        &self.info
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    /// DER-encoded SubjectPublicKeyInfo of the certificate.
    pub fn public_key_info(&self) -> &[u8] {
        &self.info.public_key_info
    }

    /// True for the empty (default) certificate.
    pub fn is_empty(&self) -> bool {
        self.der.is_empty() && self.private_key.is_none()
    }

    /// PEM encoding of the certificate bytes.
    pub fn to_pem(&self) -> Result<String> {
        self.der.to_pem()
    }

    /// Split into DER bytes and the owned key, e.g. for persistence.
    pub fn into_parts(self) -> (DerBytes, Option<PrivateKey>) {
        (self.der, self.private_key)
    }
}
