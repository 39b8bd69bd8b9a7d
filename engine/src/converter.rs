//! DER converter: turns raw certificate bytes into a structured view.
//!
//! The engine never interprets [`DerBytes`] itself. Parsing goes through the
//! [`DerConverter`] trait so certificate-parsing policy can change (or be
//! replaced by a test double) without touching issuance or import.

use der::asn1::{Ia5StringRef, ObjectIdentifier, PrintableStringRef, Utf8StringRef};
use der::{Any, Decode, Encode, Tag, Tagged};
use enclave_cert_core::error::{CertError, Result};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::SubjectAltName;

use crate::der_bytes::DerBytes;

/// id-at-organizationName
const OID_ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// id-at-commonName
const OID_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// id-ce-subjectAltName
const OID_SUBJECT_ALT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.17");

/// Parsed view of a single X.509 certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Subject organization attributes, in encoding order.
    pub organizations: Vec<String>,
    /// Subject common name, if present.
    pub common_name: Option<String>,
    /// dNSName entries of the subjectAltName extension.
    pub dns_names: Vec<String>,
    /// Serial number as encoded (big-endian, DER integer contents).
    pub serial_number: Vec<u8>,
    /// Start of validity, seconds since the Unix epoch.
    pub not_before: u64,
    /// End of validity, seconds since the Unix epoch.
    pub not_after: u64,
    /// DER-encoded SubjectPublicKeyInfo.
    pub public_key_info: Vec<u8>,
    /// Contents of the subjectPublicKey bit string (SEC1 point for EC keys).
    pub public_key: Vec<u8>,
}

impl CertificateInfo {
    /// First subject organization.
    pub fn organization(&self) -> Option<&str> {
        self.organizations.first().map(String::as_str)
    }

    pub fn serial_hex(&self) -> String {
        hex::encode(&self.serial_number)
    }
}

/// Deserializes a DER certificate blob.
pub trait DerConverter: Send + Sync {
    fn parse(&self, der: &DerBytes) -> Result<CertificateInfo>;
}

impl<T: DerConverter + ?Sized> DerConverter for &T {
    fn parse(&self, der: &DerBytes) -> Result<CertificateInfo> {
        (**self).parse(der)
    }
}

/// Default converter backed by `x509-cert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509Converter;

impl DerConverter for X509Converter {
    fn parse(&self, der: &DerBytes) -> Result<CertificateInfo> {
        let cert = x509_cert::Certificate::from_der(der.as_bytes())
            .map_err(|e| CertError::Parse(format!("Failed to parse X.509 certificate: {}", e)))?;
        let tbs = &cert.tbs_certificate;

        let mut organizations = Vec::new();
        let mut common_name = None;
        for rdn in tbs.subject.0.iter() {
            for atv in rdn.0.iter() {
                if atv.oid == OID_ORGANIZATION_NAME {
                    organizations.push(decode_directory_string(&atv.value)?);
                } else if atv.oid == OID_COMMON_NAME {
                    common_name = Some(decode_directory_string(&atv.value)?);
                }
            }
        }

        let mut dns_names = Vec::new();
        if let Some(extensions) = &tbs.extensions {
            for ext in extensions.iter() {
                if ext.extn_id != OID_SUBJECT_ALT_NAME {
                    continue;
                }
                let san = SubjectAltName::from_der(ext.extn_value.as_bytes()).map_err(|e| {
                    CertError::Parse(format!("Failed to parse subjectAltName: {}", e))
                })?;
                for name in san.0.iter() {
                    if let GeneralName::DnsName(dns) = name {
                        dns_names.push(dns.to_string());
                    }
                }
            }
        }

        let spki = &tbs.subject_public_key_info;
        let public_key_info = spki.to_der().map_err(|e| {
            CertError::Parse(format!("Failed to re-encode SubjectPublicKeyInfo: {}", e))
        })?;
        let public_key = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| {
                CertError::Parse("subjectPublicKey bit string is not octet-aligned".to_string())
            })?
            .to_vec();

        Ok(CertificateInfo {
            organizations,
            common_name,
            dns_names,
            serial_number: tbs.serial_number.as_bytes().to_vec(),
            not_before: tbs.validity.not_before.to_unix_duration().as_secs(),
            not_after: tbs.validity.not_after.to_unix_duration().as_secs(),
            public_key_info,
            public_key,
        })
    }
}

/// Decode a DirectoryString-like attribute value to text.
fn decode_directory_string(value: &Any) -> Result<String> {
    let decoded = match value.tag() {
        Tag::Utf8String => value.decode_as::<Utf8StringRef<'_>>().map(|s| s.to_string()),
        Tag::PrintableString => value
            .decode_as::<PrintableStringRef<'_>>()
            .map(|s| s.to_string()),
        Tag::Ia5String => value.decode_as::<Ia5StringRef<'_>>().map(|s| s.to_string()),
        other => {
            return Err(CertError::Parse(format!(
                "Unsupported directory string type: {}",
                other
            )))
        }
    };
    decoded.map_err(|e| CertError::Parse(format!("Invalid directory string: {}", e)))
}

/// Verify that a certificate is signed by its own key (ECDSA-P384-SHA384).
pub fn verify_self_signed(der: &DerBytes) -> Result<()> {
    use p384::ecdsa::{signature::Verifier, DerSignature, VerifyingKey};

    let cert = x509_cert::Certificate::from_der(der.as_bytes())
        .map_err(|e| CertError::Parse(format!("Failed to parse X.509 certificate: {}", e)))?;

    // The signed data is the DER of tbsCertificate
    let tbs_der = cert.tbs_certificate.to_der().map_err(|e| {
        CertError::Parse(format!("Failed to encode tbsCertificate to DER: {}", e))
    })?;

    let sig_bytes = cert.signature.as_bytes().ok_or_else(|| {
        CertError::Parse("Failed to extract signature bytes from certificate".to_string())
    })?;
    let signature = DerSignature::from_bytes(sig_bytes)
        .map_err(|e| CertError::Parse(format!("Failed to parse ECDSA signature: {}", e)))?;

    let pub_key_bytes = cert
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| CertError::Parse("Failed to extract public key bytes".to_string()))?;
    let verifying_key = VerifyingKey::from_sec1_bytes(pub_key_bytes)
        .map_err(|e| CertError::Parse(format!("Failed to create P-384 verifying key: {}", e)))?;

    verifying_key
        .verify(&tbs_der, &signature)
        .map_err(|_| CertError::Parse("Self-signature verification failed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair, PKCS_ECDSA_P384_SHA384};

    fn self_signed_der(cn: &str) -> DerBytes {
        let key = KeyPair::generate_for(&PKCS_ECDSA_P384_SHA384).unwrap();
        let mut params = CertificateParams::new(vec![cn.to_string()]).unwrap();
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn);
        dn.push(DnType::OrganizationName, "Converter Test Org");
        params.distinguished_name = dn;
        DerBytes::from(params.self_signed(&key).unwrap().der().to_vec())
    }

    #[test]
    fn test_parse_subject_and_san() {
        let der = self_signed_der("workload.example.com");
        let info = X509Converter.parse(&der).unwrap();
        assert_eq!(info.organization(), Some("Converter Test Org"));
        assert_eq!(info.common_name.as_deref(), Some("workload.example.com"));
        assert_eq!(info.dns_names, vec!["workload.example.com".to_string()]);
        assert!(info.not_before < info.not_after);
        assert_eq!(info.public_key.len(), 97);
        assert!(!info.public_key_info.is_empty());
        assert!(!info.serial_number.is_empty());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = X509Converter
            .parse(&DerBytes::from(b"some DER bytes".to_vec()))
            .unwrap_err();
        assert!(matches!(err, CertError::Parse(_)));
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(matches!(
            X509Converter.parse(&DerBytes::default()),
            Err(CertError::Parse(_))
        ));
    }

    #[test]
    fn test_verify_self_signed_accepts_own_signature() {
        let der = self_signed_der("self.example.com");
        assert!(verify_self_signed(&der).is_ok());
    }

    #[test]
    fn test_verify_self_signed_rejects_tampered_certificate() {
        let der = self_signed_der("tamper.example.com");
        let mut bytes = der.into_inner();
        // Flip a byte inside the subject common name
        let pos = bytes
            .windows(6)
            .position(|w| w == b"tamper")
            .unwrap();
        bytes[pos] ^= 0x01;
        assert!(verify_self_signed(&DerBytes::from(bytes)).is_err());
    }
}
