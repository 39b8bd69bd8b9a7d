//! TLS assembler: certificate entity -> rustls certificate/key pair.

use std::sync::Arc;

use enclave_cert_core::error::{CertError, Result};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

use crate::certificate::Certificate;
use crate::converter::{DerConverter, X509Converter};

/// A certificate and the key that signed it, ready for a TLS stack.
///
/// Both halves borrow from the [`Certificate`]; the key bytes are the very
/// buffer owned by the certificate. [`TlsPair::into_owned`] makes the copy
/// rustls needs for a long-lived configuration.
#[derive(Debug)]
pub struct TlsPair<'a> {
    cert: CertificateDer<'a>,
    key: PrivateKeyDer<'a>,
}

impl<'a> TlsPair<'a> {
    pub fn certificate(&self) -> &CertificateDer<'a> {
        &self.cert
    }

    pub fn private_key(&self) -> &PrivateKeyDer<'a> {
        &self.key
    }

    /// Detach from the certificate by copying both halves.
    pub fn into_owned(self) -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
        (self.cert.into_owned(), self.key.clone_key())
    }

    /// Build a rustls `ServerConfig` presenting this pair.
    ///
    /// Uses the ring provider explicitly instead of the process-wide default.
    pub fn server_config(&self) -> Result<rustls::ServerConfig> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = rustls::ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| CertError::Tls(format!("Failed to select protocol versions: {}", e)))?
            .with_no_client_auth()
            .with_single_cert(vec![self.cert.clone().into_owned()], self.key.clone_key())
            .map_err(|e| CertError::Tls(format!("Failed to create TLS server config: {}", e)))?;
        Ok(config)
    }
}

impl Certificate {
    /// Assemble the DER certificate and its private key into a TLS pair.
    ///
    /// Fails with
    /// - [`CertError::MissingPrivateKey`] for a public-only certificate
    /// - [`CertError::MalformedKey`] when the key is empty or not P-384
    /// - [`CertError::Parse`] when the DER bytes are not a certificate
    /// - [`CertError::KeyMismatch`] when the key does not belong to the certificate
    pub fn to_tls_pair(&self) -> Result<TlsPair<'_>> {
        let key = self.private_key().ok_or(CertError::MissingPrivateKey)?;
        let public_key = key.public_key_sec1()?;

        // Cached info may come from an injected converter; check the real DER
        let parsed = X509Converter.parse(self.der_bytes())?;
        if parsed.public_key != public_key {
            return Err(CertError::KeyMismatch);
        }

        tracing::debug!(
            serial = %parsed.serial_hex(),
            cert_size = self.der_bytes().len(),
            "Assembled TLS certificate/key pair"
        );

        Ok(TlsPair {
            cert: CertificateDer::from(self.der_bytes().as_bytes()),
            key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.as_pkcs8_der())),
        })
    }
}
