//! Certificate factory: fresh P-384 key + self-signed leaf certificate.
//!
//! Organization and FQDN arrive as untrusted bytes. They are checked against
//! the encodings they end up in (UTF8String for the organization, IA5String
//! for the dNSName) before anything is generated, then handed to the optional
//! injected validators.

use std::fmt;
use std::sync::Arc;

use enclave_cert_core::config::IssuanceConfig;
use enclave_cert_core::error::{CertError, IdentityField, Result};
use enclave_cert_core::validate::Validator;
use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, Ia5String, IsCa,
    KeyPair, KeyUsagePurpose, SanType, SerialNumber, PKCS_ECDSA_P384_SHA384,
};
use time::{Duration, OffsetDateTime};

use crate::certificate::Certificate;
use crate::converter::X509Converter;
use crate::der_bytes::DerBytes;
use crate::key::PrivateKey;

/// Issues self-signed certificates.
///
/// Holds no mutable state; one factory can serve concurrent callers.
#[derive(Clone, Default)]
pub struct CertificateFactory {
    config: IssuanceConfig,
    organization_validator: Option<Arc<dyn Validator>>,
    fqdn_validator: Option<Arc<dyn Validator>>,
}

impl CertificateFactory {
    pub fn new(config: IssuanceConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Gate the organization through `validator` before encoding.
    pub fn with_organization_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.organization_validator = Some(validator);
        self
    }

    /// Gate the FQDN through `validator` before encoding.
    pub fn with_fqdn_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.fqdn_validator = Some(validator);
        self
    }

    pub fn config(&self) -> &IssuanceConfig {
        &self.config
    }

    /// Generate a P-384 key pair and a self-signed certificate for it.
    ///
    /// The subject carries `organization` as O and, when `fqdn` is not
    /// empty, `fqdn` as CN and as a dNSName subjectAltName.
    ///
    /// Errors are returned without any partially built certificate:
    /// - [`CertError::InvalidIdentity`] for a non-UTF-8 organization or a
    ///   non-ASCII FQDN
    /// - [`CertError::IdentityRejected`] when an injected validator refuses
    /// - [`CertError::Config`] for an unusable [`IssuanceConfig`]
    /// - [`CertError::Generation`] if key generation or signing fails
    pub fn make_certificate(
        &self,
        organization: impl AsRef<[u8]>,
        fqdn: impl AsRef<[u8]>,
    ) -> Result<Certificate> {
        self.config.validate()?;

        let organization = decode_organization(organization.as_ref())?;
        let fqdn = decode_fqdn(fqdn.as_ref())?;

        if let Some(validator) = &self.organization_validator {
            validator
                .validate(organization)
                .map_err(|e| CertError::IdentityRejected {
                    field: IdentityField::Organization,
                    reason: e.reason().to_string(),
                })?;
        }
        if let Some(validator) = &self.fqdn_validator {
            validator
                .validate(fqdn)
                .map_err(|e| CertError::IdentityRejected {
                    field: IdentityField::Fqdn,
                    reason: e.reason().to_string(),
                })?;
        }

        let params = self.certificate_params(organization, fqdn)?;

        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P384_SHA384).map_err(|e| {
            CertError::Generation(format!("Failed to generate P-384 key pair: {}", e))
        })?;
        let cert = params.self_signed(&key_pair).map_err(|e| {
            CertError::Generation(format!("Failed to self-sign certificate: {}", e))
        })?;

        let der = DerBytes::from(cert.der().to_vec());
        let private_key = PrivateKey::from_pkcs8_der(key_pair.serialize_der());

        // Re-parse the output and check it carries the generated public key
        let certificate = Certificate::from_raw(der, &X509Converter, Some(private_key))?;

        tracing::info!(
            serial = %certificate.info().serial_hex(),
            fingerprint = %certificate.der_bytes().fingerprint(),
            cert_size = certificate.der_bytes().len(),
            "Issued self-signed P-384 certificate"
        );

        Ok(certificate)
    }

    fn certificate_params(&self, organization: &str, fqdn: &str) -> Result<CertificateParams> {
        let mut params = CertificateParams::default();

        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, organization);
        if !fqdn.is_empty() {
            dn.push(DnType::CommonName, fqdn);
            let dns_name = Ia5String::try_from(fqdn.to_string()).map_err(|e| {
                CertError::InvalidIdentity {
                    field: IdentityField::Fqdn,
                    reason: e.to_string(),
                }
            })?;
            params.subject_alt_names = vec![SanType::DnsName(dns_name)];
        }
        params.distinguished_name = dn;

        let now = OffsetDateTime::now_utc();
        let skew = i64::try_from(self.config.clock_skew_secs)
            .map(Duration::seconds)
            .map_err(|_| CertError::Config("clock_skew_secs out of range".to_string()))?;
        params.not_before = now.checked_sub(skew).ok_or_else(|| {
            CertError::Config("not_before is outside the representable date range".to_string())
        })?;
        params.not_after = now
            .checked_add(Duration::days(i64::from(self.config.validity_days)))
            .ok_or_else(|| {
                CertError::Config(
                    "not_after is outside the representable date range".to_string(),
                )
            })?;

        // Random positive 128-bit serial
        let mut serial: [u8; 16] = rand::random();
        serial[0] &= 0x7F;
        params.serial_number = Some(SerialNumber::from(serial.to_vec()));

        params.is_ca = IsCa::ExplicitNoCa;
        params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
        params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];

        Ok(params)
    }
}

impl fmt::Debug for CertificateFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateFactory")
            .field("config", &self.config)
            .field("organization_validator", &self.organization_validator.is_some())
            .field("fqdn_validator", &self.fqdn_validator.is_some())
            .finish()
    }
}

/// Issue a certificate with the default configuration and no validators.
pub fn make_certificate(
    organization: impl AsRef<[u8]>,
    fqdn: impl AsRef<[u8]>,
) -> Result<Certificate> {
    CertificateFactory::default().make_certificate(organization, fqdn)
}

/// The organization is encoded as a UTF8String.
fn decode_organization(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| CertError::InvalidIdentity {
        field: IdentityField::Organization,
        reason: "string not valid UTF-8".to_string(),
    })
}

/// The FQDN is encoded as an IA5String, i.e. 7-bit ASCII.
fn decode_fqdn(bytes: &[u8]) -> Result<&str> {
    let invalid = || CertError::InvalidIdentity {
        field: IdentityField::Fqdn,
        reason: format!("\"{}\" cannot be encoded as an IA5String", bytes.escape_ascii()),
    };
    if !bytes.is_ascii() {
        return Err(invalid());
    }
    std::str::from_utf8(bytes).map_err(|_| invalid())
}
