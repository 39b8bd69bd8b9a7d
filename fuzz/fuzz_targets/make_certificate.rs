//! Fuzz harness for `make_certificate`.
//!
//! Splits the input into an organization and an FQDN and issues a
//! certificate. Issuance must never panic: it either yields a certificate
//! that parses and assembles into a TLS pair, or fails with an identity
//! encoding error.

#![no_main]
use enclave_cert::{make_certificate, CertError, DerConverter, X509Converter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the split point between organization and FQDN
    let (split, rest) = match data.split_first() {
        Some((split, rest)) => (*split as usize % (rest.len() + 1), rest),
        None => (0, data),
    };
    let (organization, fqdn) = rest.split_at(split);

    match make_certificate(organization, fqdn) {
        Ok(cert) => {
            assert!(X509Converter.parse(cert.der_bytes()).is_ok());
            assert!(cert.to_tls_pair().is_ok());
        }
        Err(CertError::InvalidIdentity { .. }) => {}
        Err(other) => panic!("unexpected issuance error: {}", other),
    }
});
