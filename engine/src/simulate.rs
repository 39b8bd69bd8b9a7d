//! Simulated attestation for development and testing.
//!
//! Outside a TEE there is no attestation device. When
//! `ENCLAVE_CERT_SIMULATE=1` is set, [`select_attester`] swaps the device for
//! [`SimulatedAttester`]: it returns an unsigned JSON document echoing the
//! request, marked `simulated: true` so a relying party can refuse it.

use enclave_cert_core::attest::{Attester, AttesterError};
use enclave_cert_core::config::is_simulate_mode;
use serde::{Deserialize, Serialize};

/// Unsigned stand-in for a hardware attestation document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedDocument {
    /// Always true; lets verifiers reject simulated documents cheaply.
    pub simulated: bool,
    #[serde(with = "base64_serde")]
    pub nonce: Vec<u8>,
    #[serde(with = "base64_serde")]
    pub public_key: Vec<u8>,
    #[serde(with = "base64_serde")]
    pub user_data: Vec<u8>,
}

/// Attester that needs no hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAttester;

impl Attester for SimulatedAttester {
    fn attest(
        &self,
        nonce: &[u8],
        public_key: &[u8],
        user_data: &[u8],
    ) -> std::result::Result<Vec<u8>, AttesterError> {
        tracing::warn!("Producing simulated attestation document (not hardware-attested)");
        let document = SimulatedDocument {
            simulated: true,
            nonce: nonce.to_vec(),
            public_key: public_key.to_vec(),
            user_data: user_data.to_vec(),
        };
        serde_json::to_vec(&document).map_err(|e| {
            AttesterError::Other(format!("Failed to serialize simulated document: {}", e))
        })
    }
}

/// Attester chosen at startup: the hardware device or the simulator.
#[derive(Debug, Clone)]
pub enum SelectedAttester<A> {
    Device(A),
    Simulated(SimulatedAttester),
}

impl<A> SelectedAttester<A> {
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }
}

impl<A: Attester> Attester for SelectedAttester<A> {
    fn attest(
        &self,
        nonce: &[u8],
        public_key: &[u8],
        user_data: &[u8],
    ) -> std::result::Result<Vec<u8>, AttesterError> {
        match self {
            Self::Device(device) => device.attest(nonce, public_key, user_data),
            Self::Simulated(simulated) => simulated.attest(nonce, public_key, user_data),
        }
    }
}

/// Use `device` unless `ENCLAVE_CERT_SIMULATE` enables simulation mode.
pub fn select_attester<A: Attester>(device: A) -> SelectedAttester<A> {
    select_attester_with(is_simulate_mode(), device)
}

/// Same as [`select_attester`] with the simulation flag supplied by the caller.
pub fn select_attester_with<A: Attester>(simulate: bool, device: A) -> SelectedAttester<A> {
    if simulate {
        tracing::warn!("Simulation mode enabled, attestation documents are not hardware-backed");
        SelectedAttester::Simulated(SimulatedAttester)
    } else {
        SelectedAttester::Device(device)
    }
}

/// Parse a document produced by [`SimulatedAttester`].
///
/// Returns `None` for anything else, including real hardware documents.
pub fn parse_simulated_document(document: &[u8]) -> Option<SimulatedDocument> {
    serde_json::from_slice::<SimulatedDocument>(document)
        .ok()
        .filter(|doc| doc.simulated)
}

mod base64_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
        use base64::Engine;
        s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<u8>, D::Error> {
        use base64::Engine;
        let s = String::deserialize(d)?;
        base64::engine::general_purpose::STANDARD
            .decode(&s)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_document_roundtrip() {
        let bytes = SimulatedAttester.attest(b"nonce", b"spki", b"user").unwrap();
        let doc = parse_simulated_document(&bytes).unwrap();
        assert!(doc.simulated);
        assert_eq!(doc.nonce, b"nonce");
        assert_eq!(doc.public_key, b"spki");
        assert_eq!(doc.user_data, b"user");
    }

    #[test]
    fn test_simulated_document_uses_base64_fields() {
        let bytes = SimulatedAttester.attest(&[0xFF], b"", b"").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["nonce"], "/w==");
        assert_eq!(json["simulated"], true);
    }

    /// Stand-in for a hardware device answering with a fixed document.
    struct FixedDevice;

    impl Attester for FixedDevice {
        fn attest(
            &self,
            _nonce: &[u8],
            _public_key: &[u8],
            _user_data: &[u8],
        ) -> std::result::Result<Vec<u8>, AttesterError> {
            Ok(b"device-document".to_vec())
        }
    }

    #[test]
    fn test_select_attester_simulation_enabled() {
        let attester = select_attester_with(true, FixedDevice);
        assert!(attester.is_simulated());
        let bytes = attester.attest(b"nonce", b"spki", b"").unwrap();
        let doc = parse_simulated_document(&bytes).unwrap();
        assert_eq!(doc.nonce, b"nonce");
    }

    #[test]
    fn test_select_attester_simulation_disabled() {
        let attester = select_attester_with(false, FixedDevice);
        assert!(!attester.is_simulated());
        let bytes = attester.attest(b"nonce", b"spki", b"").unwrap();
        assert_eq!(bytes, b"device-document");
        assert!(parse_simulated_document(&bytes).is_none());
    }

    #[test]
    fn test_parse_rejects_non_simulated() {
        let json = br#"{"simulated":false,"nonce":"","public_key":"","user_data":""}"#;
        assert!(parse_simulated_document(json).is_none());
        assert!(parse_simulated_document(b"\x84\x44\xa1\x01\x38\x22").is_none());
    }
}
