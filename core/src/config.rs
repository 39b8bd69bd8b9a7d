use serde::{Deserialize, Serialize};

use crate::error::{CertError, Result};

/// Environment variable that switches attestation to the simulated attester.
pub const SIMULATE_ENV: &str = "ENCLAVE_CERT_SIMULATE";

/// Largest accepted backdating of `not_before`.
const MAX_CLOCK_SKEW_SECS: u64 = 24 * 60 * 60;

/// Largest accepted validity period (100 years).
pub const MAX_VALIDITY_DAYS: u32 = 36_500;

/// Issuance configuration for freshly generated certificates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuanceConfig {
    /// Days from issuance until `not_after`
    pub validity_days: u32,

    /// Seconds `not_before` is moved into the past so relying parties with a
    /// slightly slow clock still accept the certificate
    pub clock_skew_secs: u64,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            validity_days: 365,
            clock_skew_secs: 60,
        }
    }
}

impl IssuanceConfig {
    /// Reject configurations that would produce an unusable certificate.
    pub fn validate(&self) -> Result<()> {
        if self.validity_days == 0 {
            return Err(CertError::Config(
                "validity_days must be at least 1".to_string(),
            ));
        }
        if self.validity_days > MAX_VALIDITY_DAYS {
            return Err(CertError::Config(format!(
                "validity_days {} exceeds maximum of {}",
                self.validity_days, MAX_VALIDITY_DAYS
            )));
        }
        if self.clock_skew_secs > MAX_CLOCK_SKEW_SECS {
            return Err(CertError::Config(format!(
                "clock_skew_secs {} exceeds maximum of {}",
                self.clock_skew_secs, MAX_CLOCK_SKEW_SECS
            )));
        }
        Ok(())
    }
}

/// Check if simulation mode is enabled via environment variable.
pub fn is_simulate_mode() -> bool {
    simulate_flag(std::env::var(SIMULATE_ENV).ok().as_deref())
}

/// Interpret a value of [`SIMULATE_ENV`]: `1` or `true` (any case) enables it.
pub fn simulate_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
